//! Fee ledger domain types.
//!
//! These are in-memory snapshots consumed and produced by the dues engine;
//! persistence belongs to the database layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sekolah_shared::Metadata;
use uuid::Uuid;

/// Status of a fee due.
///
/// Allocations move a due `Pending -> PartiallyPaid -> Paid` with a
/// monotonically decreasing balance. `Overdue` is derived from the due date
/// at read time, never stored by the engine. `Waived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Nothing paid yet.
    Pending,
    /// Some, but not all, of the original amount paid.
    PartiallyPaid,
    /// Fully settled through allocations (immutable).
    Paid,
    /// Administratively cancelled without payment (immutable).
    Waived,
    /// Outstanding and past its due date (derived).
    Overdue,
}

impl DueStatus {
    /// Returns true for terminal states that accept no further mutation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Waived)
    }

    /// Returns true for states with an outstanding balance.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        matches!(self, Self::Pending | Self::PartiallyPaid | Self::Overdue)
    }

    /// Returns the stable slug stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Waived => "waived",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for DueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete fee obligation owed by one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDue {
    /// The due ID.
    pub id: Uuid,
    /// The student owing this due.
    pub student_id: Uuid,
    /// The fee structure this due was instantiated from.
    pub fee_structure_id: Uuid,
    /// Fee type label (e.g. "tuition", "transport").
    pub fee_type: String,
    /// Academic year label (e.g. "2026/2027").
    pub academic_year: String,
    /// The student's grade when the due was raised.
    pub current_grade: Option<String>,
    /// The date payment falls due.
    pub due_date: NaiveDate,
    /// The amount originally owed.
    pub original_amount: Decimal,
    /// The amount still owed; never negative, never above the original.
    pub balance_amount: Decimal,
    /// Stored status; readers re-derive overdue from the due date.
    pub status: DueStatus,
    /// Free-form metadata; waiver audit fields live here.
    pub metadata: Metadata,
}

impl FeeDue {
    /// The amount settled so far through allocations.
    #[must_use]
    pub fn amount_paid(&self) -> Decimal {
        self.original_amount - self.balance_amount
    }
}

/// A payment's allocation-relevant fields.
#[derive(Debug, Clone, Copy)]
pub struct PaymentSnapshot {
    /// The payment ID.
    pub id: Uuid,
    /// The payment's total value (amount paid + late fee - discount).
    pub total_amount: Decimal,
    /// The value already distributed to dues by earlier allocations.
    pub allocated_amount: Decimal,
}

impl PaymentSnapshot {
    /// The value still available for allocation.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.total_amount - self.allocated_amount
    }
}

/// One requested allocation: apply `amount` of a payment to one due.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AllocationRequest {
    /// The due to pay down.
    pub due_id: Uuid,
    /// The amount to apply (must be positive).
    pub amount: Decimal,
}

/// The resolved effect of one allocation on one due.
#[derive(Debug, Clone)]
pub struct DueUpdate {
    /// The due being updated.
    pub due_id: Uuid,
    /// The amount applied.
    pub amount: Decimal,
    /// The balance before this update; the conditional write predicates
    /// on this value.
    pub previous_balance: Decimal,
    /// The balance after this update.
    pub new_balance: Decimal,
    /// The status derived from the new balance.
    pub new_status: DueStatus,
}

/// A validated, all-or-nothing allocation batch.
#[derive(Debug, Clone)]
pub struct AllocationPlan {
    /// The payment being distributed.
    pub payment_id: Uuid,
    /// Total value this plan distributes.
    pub total_allocated: Decimal,
    /// Per-due updates, in request order.
    pub updates: Vec<DueUpdate>,
}

/// The resolved effect of waiving a due.
#[derive(Debug, Clone)]
pub struct WaiverOutcome {
    /// The waived due.
    pub due_id: Uuid,
    /// The balance cancelled by the waiver.
    pub amount_waived: Decimal,
    /// The due's metadata with the waiver audit fields merged in.
    pub metadata: Metadata,
}

/// Summary of one fee type's dues for a student.
#[derive(Debug, Clone, Serialize)]
pub struct FeeTypeSummary {
    /// The fee type label.
    pub fee_type: String,
    /// Number of dues of this type.
    pub count: usize,
    /// Sum of original amounts.
    pub total_original: Decimal,
    /// Sum of outstanding balances.
    pub total_balance: Decimal,
    /// Sum paid so far.
    pub total_paid: Decimal,
}

/// Dues grouped by fee type with overall totals.
#[derive(Debug, Clone, Serialize)]
pub struct DuesSummary {
    /// Per-fee-type rollups, ordered by fee type.
    pub by_type: Vec<FeeTypeSummary>,
    /// Number of dues summarized.
    pub due_count: usize,
    /// Sum of original amounts across all dues.
    pub total_original: Decimal,
    /// Sum of outstanding balances across all dues.
    pub total_balance: Decimal,
    /// Sum paid across all dues.
    pub total_paid: Decimal,
}

/// Elapsed-days bands for overdue aging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// 0-30 days past due.
    Days0To30,
    /// 31-60 days past due.
    Days31To60,
    /// 61-90 days past due.
    Days61To90,
    /// More than 90 days past due.
    Over90,
}

impl AgeBand {
    /// All bands in ascending order.
    pub const ALL: [Self; 4] = [
        Self::Days0To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Over90,
    ];

    /// Classifies a days-overdue count into its band.
    ///
    /// Callers guarantee `days >= 1` (the due date is strictly in the
    /// past); non-positive inputs land in the first band.
    #[must_use]
    pub const fn from_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=30 => Self::Days0To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Human-readable range label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Days0To30 => "0-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Over90 => "90+",
        }
    }
}

/// Count and balance aggregated into one aging band.
#[derive(Debug, Clone, Serialize)]
pub struct AgingBucket {
    /// The band this bucket covers.
    pub band: AgeBand,
    /// Number of dues in the band.
    pub count: usize,
    /// Summed outstanding balance in the band.
    pub total_balance: Decimal,
}

/// Aging buckets for one fee type.
#[derive(Debug, Clone, Serialize)]
pub struct FeeTypeAging {
    /// The fee type label.
    pub fee_type: String,
    /// One bucket per band, always all four, ascending.
    pub buckets: Vec<AgingBucket>,
}

/// Overdue aging report.
#[derive(Debug, Clone, Serialize)]
pub struct AgingReport {
    /// The single date snapshot the whole report was computed against.
    pub as_of: NaiveDate,
    /// Per-fee-type buckets, ordered by fee type.
    pub by_type: Vec<FeeTypeAging>,
    /// Overall buckets across every fee type.
    pub overall: Vec<AgingBucket>,
    /// Number of overdue dues covered.
    pub due_count: usize,
    /// Total overdue balance.
    pub total_balance: Decimal,
}

/// Composed dues report: totals, per-type summary, and aging.
#[derive(Debug, Clone, Serialize)]
pub struct DuesReport {
    /// The date the report was generated against.
    pub as_of: NaiveDate,
    /// Total outstanding balance across all dues.
    pub total_outstanding: Decimal,
    /// Grouped-by-type summary.
    pub summary: DuesSummary,
    /// Overdue aging buckets.
    pub aging: AgingReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_predicates() {
        assert!(DueStatus::Paid.is_terminal());
        assert!(DueStatus::Waived.is_terminal());
        assert!(!DueStatus::Pending.is_terminal());
        assert!(!DueStatus::Overdue.is_terminal());

        assert!(DueStatus::Pending.is_outstanding());
        assert!(DueStatus::PartiallyPaid.is_outstanding());
        assert!(DueStatus::Overdue.is_outstanding());
        assert!(!DueStatus::Paid.is_outstanding());
        assert!(!DueStatus::Waived.is_outstanding());
    }

    #[test]
    fn test_payment_remaining() {
        let payment = PaymentSnapshot {
            id: Uuid::new_v4(),
            total_amount: dec!(1000),
            allocated_amount: dec!(250),
        };
        assert_eq!(payment.remaining(), dec!(750));
    }

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(AgeBand::from_days_overdue(1), AgeBand::Days0To30);
        assert_eq!(AgeBand::from_days_overdue(30), AgeBand::Days0To30);
        assert_eq!(AgeBand::from_days_overdue(31), AgeBand::Days31To60);
        assert_eq!(AgeBand::from_days_overdue(60), AgeBand::Days31To60);
        assert_eq!(AgeBand::from_days_overdue(61), AgeBand::Days61To90);
        assert_eq!(AgeBand::from_days_overdue(90), AgeBand::Days61To90);
        assert_eq!(AgeBand::from_days_overdue(91), AgeBand::Over90);
        assert_eq!(AgeBand::from_days_overdue(10_000), AgeBand::Over90);
    }

    #[test]
    fn test_band_labels() {
        let labels: Vec<_> = AgeBand::ALL.iter().map(AgeBand::label).collect();
        assert_eq!(labels, ["0-30", "31-60", "61-90", "90+"]);
    }
}
