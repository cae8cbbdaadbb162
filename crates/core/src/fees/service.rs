//! Dues service: waivers, summaries, and the composed report.
//!
//! Pure business logic with no database dependencies; the repository layer
//! loads dues and applies the outcomes these functions produce.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sekolah_shared::Metadata;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::aging::age_overdue;
use super::error::FeeError;
use super::types::{DuesReport, DuesSummary, FeeDue, FeeTypeSummary, WaiverOutcome};

/// Metadata key recording why a due was waived.
pub const META_WAIVED_REASON: &str = "waived_reason";
/// Metadata key recording who waived a due.
pub const META_WAIVED_BY: &str = "waived_by";
/// Metadata key recording when a due was waived.
pub const META_WAIVED_AT: &str = "waived_at";

/// Fee dues business logic.
pub struct DuesService;

impl DuesService {
    /// Resolves a waiver: balance to zero, terminal status, audit fields
    /// merged into the due's metadata without discarding existing keys.
    ///
    /// # Errors
    ///
    /// Returns `WaiveInvalidState` if the due is already Paid or Waived;
    /// waiving is one-way and never repeats.
    pub fn plan_waiver(
        due: &FeeDue,
        reason: &str,
        actor_id: Uuid,
        waived_at: DateTime<Utc>,
    ) -> Result<WaiverOutcome, FeeError> {
        if due.status.is_terminal() {
            return Err(FeeError::WaiveInvalidState(due.status));
        }

        let mut audit = Metadata::new();
        audit.insert(META_WAIVED_REASON, json!(reason));
        audit.insert(META_WAIVED_BY, json!(actor_id.to_string()));
        audit.insert(META_WAIVED_AT, json!(waived_at.to_rfc3339()));

        Ok(WaiverOutcome {
            due_id: due.id,
            amount_waived: due.balance_amount,
            metadata: due.metadata.clone().merged(audit),
        })
    }

    /// Groups dues by fee type with per-group and overall totals.
    ///
    /// Read-only and side-effect-free; safe to call concurrently and
    /// repeatedly. Sums run at full precision and round only in the
    /// returned rollups.
    #[must_use]
    pub fn summarize_dues(dues: &[FeeDue]) -> DuesSummary {
        struct Totals {
            count: usize,
            original: Decimal,
            balance: Decimal,
        }

        let mut by_type: BTreeMap<&str, Totals> = BTreeMap::new();
        let mut total_original = Decimal::ZERO;
        let mut total_balance = Decimal::ZERO;

        for due in dues {
            let entry = by_type.entry(due.fee_type.as_str()).or_insert(Totals {
                count: 0,
                original: Decimal::ZERO,
                balance: Decimal::ZERO,
            });
            entry.count += 1;
            entry.original += due.original_amount;
            entry.balance += due.balance_amount;

            total_original += due.original_amount;
            total_balance += due.balance_amount;
        }

        DuesSummary {
            by_type: by_type
                .into_iter()
                .map(|(fee_type, totals)| FeeTypeSummary {
                    fee_type: fee_type.to_string(),
                    count: totals.count,
                    total_original: totals.original.round_dp(2),
                    total_balance: totals.balance.round_dp(2),
                    total_paid: (totals.original - totals.balance).round_dp(2),
                })
                .collect(),
            due_count: dues.len(),
            total_original: total_original.round_dp(2),
            total_balance: total_balance.round_dp(2),
            total_paid: (total_original - total_balance).round_dp(2),
        }
    }

    /// Assembles the full dues report: total outstanding, grouped summary,
    /// and aging buckets, all against one date snapshot.
    #[must_use]
    pub fn generate_dues_report(dues: &[FeeDue], today: NaiveDate) -> DuesReport {
        let summary = Self::summarize_dues(dues);
        let aging = age_overdue(dues, today);

        DuesReport {
            as_of: today,
            total_outstanding: summary.total_balance,
            summary,
            aging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::types::DueStatus;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_due(fee_type: &str, original: Decimal, balance: Decimal, status: DueStatus) -> FeeDue {
        FeeDue {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            fee_structure_id: Uuid::new_v4(),
            fee_type: fee_type.to_string(),
            academic_year: "2026/2027".to_string(),
            current_grade: None,
            due_date: date(2026, 9, 1),
            original_amount: original,
            balance_amount: balance,
            status,
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_waiver_merges_metadata() {
        let mut due = make_due("tuition", dec!(500), dec!(500), DueStatus::Pending);
        due.metadata.insert("scholarship", json!("partial"));
        let actor = Uuid::new_v4();

        let outcome =
            DuesService::plan_waiver(&due, "financial hardship", actor, Utc::now()).unwrap();

        assert_eq!(outcome.due_id, due.id);
        assert_eq!(outcome.amount_waived, dec!(500));
        assert_eq!(
            outcome.metadata.get(META_WAIVED_REASON),
            Some(&json!("financial hardship"))
        );
        assert_eq!(
            outcome.metadata.get(META_WAIVED_BY),
            Some(&json!(actor.to_string()))
        );
        assert!(outcome.metadata.get(META_WAIVED_AT).is_some());
        // Pre-existing keys survive the merge.
        assert_eq!(outcome.metadata.get("scholarship"), Some(&json!("partial")));
    }

    #[test]
    fn test_waiver_rejected_on_terminal_states() {
        let paid = make_due("tuition", dec!(500), dec!(0), DueStatus::Paid);
        assert!(matches!(
            DuesService::plan_waiver(&paid, "any", Uuid::new_v4(), Utc::now()),
            Err(FeeError::WaiveInvalidState(DueStatus::Paid))
        ));

        let waived = make_due("tuition", dec!(500), dec!(0), DueStatus::Waived);
        assert!(matches!(
            DuesService::plan_waiver(&waived, "again", Uuid::new_v4(), Utc::now()),
            Err(FeeError::WaiveInvalidState(DueStatus::Waived))
        ));
    }

    #[test]
    fn test_waiver_allowed_on_partial_and_overdue() {
        for status in [
            DueStatus::Pending,
            DueStatus::PartiallyPaid,
            DueStatus::Overdue,
        ] {
            let due = make_due("tuition", dec!(500), dec!(300), status);
            let outcome =
                DuesService::plan_waiver(&due, "hardship", Uuid::new_v4(), Utc::now()).unwrap();
            assert_eq!(outcome.amount_waived, dec!(300));
        }
    }

    #[test]
    fn test_summary_groups_by_fee_type() {
        let dues = vec![
            make_due("tuition", dec!(1000), dec!(600), DueStatus::PartiallyPaid),
            make_due("tuition", dec!(1000), dec!(1000), DueStatus::Pending),
            make_due("transport", dec!(200), dec!(0), DueStatus::Paid),
        ];

        let summary = DuesService::summarize_dues(&dues);
        assert_eq!(summary.due_count, 3);
        assert_eq!(summary.total_original, dec!(2200));
        assert_eq!(summary.total_balance, dec!(1600));
        assert_eq!(summary.total_paid, dec!(600));

        assert_eq!(summary.by_type.len(), 2);
        let transport = &summary.by_type[0];
        assert_eq!(transport.fee_type, "transport");
        assert_eq!(transport.count, 1);
        assert_eq!(transport.total_paid, dec!(200));

        let tuition = &summary.by_type[1];
        assert_eq!(tuition.count, 2);
        assert_eq!(tuition.total_original, dec!(2000));
        assert_eq!(tuition.total_balance, dec!(1600));
        assert_eq!(tuition.total_paid, dec!(400));
    }

    #[test]
    fn test_summary_of_empty_set() {
        let summary = DuesService::summarize_dues(&[]);
        assert_eq!(summary.due_count, 0);
        assert!(summary.by_type.is_empty());
        assert_eq!(summary.total_balance, dec!(0));
    }

    #[test]
    fn test_report_composes_summary_and_aging() {
        let today = date(2026, 8, 1);
        let mut overdue = make_due("tuition", dec!(1000), dec!(400), DueStatus::PartiallyPaid);
        overdue.due_date = date(2026, 7, 1);
        let current = make_due("tuition", dec!(1000), dec!(1000), DueStatus::Pending);

        let report = DuesService::generate_dues_report(&[overdue, current], today);

        assert_eq!(report.as_of, today);
        assert_eq!(report.total_outstanding, dec!(1400));
        assert_eq!(report.summary.due_count, 2);
        assert_eq!(report.aging.due_count, 1);
        assert_eq!(report.aging.total_balance, dec!(400));
    }
}
