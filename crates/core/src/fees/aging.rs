//! Overdue aging buckets.
//!
//! Buckets every outstanding, past-due obligation into elapsed-days bands,
//! per fee type and overall. The whole computation runs against one date
//! snapshot so band boundaries stay consistent across thousands of rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::status::effective_status;
use super::types::{AgeBand, AgingBucket, AgingReport, FeeDue, FeeTypeAging};

/// Per-band accumulator: (count, summed balance) for each of the four bands.
#[derive(Default, Clone)]
struct BandTotals {
    counts: [usize; 4],
    balances: [Decimal; 4],
}

impl BandTotals {
    fn add(&mut self, band: AgeBand, balance: Decimal) {
        let i = band as usize;
        self.counts[i] += 1;
        self.balances[i] += balance;
    }

    fn into_buckets(self) -> Vec<AgingBucket> {
        AgeBand::ALL
            .into_iter()
            .map(|band| AgingBucket {
                band,
                count: self.counts[band as usize],
                // Full-precision sums; round only at this reporting boundary.
                total_balance: self.balances[band as usize].round_dp(2),
            })
            .collect()
    }
}

/// Builds the overdue aging report for a set of dues.
///
/// Eligible dues are those with an outstanding effective status
/// (pending/partially paid, so overdue once re-derived) and a due date
/// strictly before `today`. Each eligible due lands in exactly one band.
/// Read-only and idempotent.
#[must_use]
pub fn age_overdue(dues: &[FeeDue], today: NaiveDate) -> AgingReport {
    let mut overall = BandTotals::default();
    let mut by_type: BTreeMap<&str, BandTotals> = BTreeMap::new();
    let mut due_count = 0usize;
    let mut total_balance = Decimal::ZERO;

    for due in dues {
        if !effective_status(due, today).is_outstanding() || due.due_date >= today {
            continue;
        }

        let days = (today - due.due_date).num_days();
        let band = AgeBand::from_days_overdue(days);

        overall.add(band, due.balance_amount);
        by_type
            .entry(due.fee_type.as_str())
            .or_default()
            .add(band, due.balance_amount);
        due_count += 1;
        total_balance += due.balance_amount;
    }

    AgingReport {
        as_of: today,
        by_type: by_type
            .into_iter()
            .map(|(fee_type, totals)| FeeTypeAging {
                fee_type: fee_type.to_string(),
                buckets: totals.into_buckets(),
            })
            .collect(),
        overall: overall.into_buckets(),
        due_count,
        total_balance: total_balance.round_dp(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::types::DueStatus;
    use rust_decimal_macros::dec;
    use sekolah_shared::Metadata;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_due(fee_type: &str, due_date: NaiveDate, balance: Decimal) -> FeeDue {
        FeeDue {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            fee_structure_id: Uuid::new_v4(),
            fee_type: fee_type.to_string(),
            academic_year: "2026/2027".to_string(),
            current_grade: None,
            due_date,
            original_amount: dec!(1000),
            balance_amount: balance,
            status: DueStatus::Pending,
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_bands_by_elapsed_days() {
        let today = date(2026, 8, 1);
        let dues = vec![
            make_due("tuition", date(2026, 7, 22), dec!(100)), // 10 days
            make_due("tuition", date(2026, 6, 17), dec!(200)), // 45 days
            make_due("tuition", date(2026, 5, 23), dec!(300)), // 70 days
            make_due("tuition", date(2026, 1, 1), dec!(400)),  // 212 days
        ];

        let report = age_overdue(&dues, today);
        assert_eq!(report.due_count, 4);
        assert_eq!(report.total_balance, dec!(1000));

        let counts: Vec<_> = report.overall.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 1, 1]);
        assert_eq!(report.overall[0].total_balance, dec!(100));
        assert_eq!(report.overall[3].total_balance, dec!(400));
    }

    #[test]
    fn test_settled_and_future_dues_excluded() {
        let today = date(2026, 8, 1);
        let mut settled = make_due("tuition", date(2026, 7, 1), dec!(0));
        settled.status = DueStatus::Paid;
        let mut waived = make_due("tuition", date(2026, 7, 1), dec!(0));
        waived.status = DueStatus::Waived;
        let future = make_due("tuition", date(2026, 9, 1), dec!(500));
        let due_today = make_due("tuition", today, dec!(500));

        let report = age_overdue(&[settled, waived, future, due_today], today);
        assert_eq!(report.due_count, 0);
        assert_eq!(report.total_balance, dec!(0));
        assert!(report.by_type.is_empty());
    }

    #[test]
    fn test_grouped_by_fee_type_in_order() {
        let today = date(2026, 8, 1);
        let dues = vec![
            make_due("transport", date(2026, 7, 1), dec!(50)),
            make_due("tuition", date(2026, 7, 1), dec!(150)),
            make_due("tuition", date(2026, 4, 1), dec!(250)),
        ];

        let report = age_overdue(&dues, today);
        let types: Vec<_> = report.by_type.iter().map(|t| t.fee_type.as_str()).collect();
        assert_eq!(types, ["transport", "tuition"]);

        let tuition = &report.by_type[1];
        assert_eq!(tuition.buckets[0].count, 0);
        assert_eq!(tuition.buckets[1].count, 1); // 31 days overdue
        assert_eq!(tuition.buckets[3].count, 1); // 122 days overdue
    }

    #[test]
    fn test_buckets_partition_eligible_dues() {
        let today = date(2026, 8, 1);
        let dues: Vec<FeeDue> = (1..=120)
            .map(|i| make_due("exam", today - chrono::Duration::days(i), dec!(10)))
            .collect();

        let report = age_overdue(&dues, today);
        let bucket_total: usize = report.overall.iter().map(|b| b.count).sum();
        assert_eq!(bucket_total, report.due_count);
        assert_eq!(report.due_count, 120);
    }
}
