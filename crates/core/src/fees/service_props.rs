//! Property-based tests for the dues engine.
//!
//! - Property 1: money conservation — a planned allocation removes exactly
//!   what it applies, and no balance ever goes negative
//! - Property 2: allocation batches are all-or-nothing
//! - Property 3: aging buckets partition eligible dues exactly once

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use sekolah_shared::Metadata;
use std::collections::HashMap;
use uuid::Uuid;

use super::aging::age_overdue;
use super::allocation::plan_allocation;
use super::error::FeeError;
use super::types::{AllocationRequest, DueStatus, FeeDue, PaymentSnapshot};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

fn due_id(i: usize) -> Uuid {
    Uuid::from_u128(u128::try_from(i).unwrap() + 1)
}

fn make_due(i: usize, original_cents: i64, balance_cents: i64, days_offset: i64) -> FeeDue {
    let original = Decimal::new(original_cents, 2);
    let balance = Decimal::new(balance_cents, 2);
    FeeDue {
        id: due_id(i),
        student_id: Uuid::from_u128(9000),
        fee_structure_id: Uuid::from_u128(9001),
        fee_type: if i % 2 == 0 { "tuition" } else { "transport" }.to_string(),
        academic_year: "2026/2027".to_string(),
        current_grade: None,
        due_date: today() + chrono::Duration::days(days_offset),
        original_amount: original,
        balance_amount: balance,
        status: if balance == original {
            DueStatus::Pending
        } else if balance.is_zero() {
            DueStatus::Paid
        } else {
            DueStatus::PartiallyPaid
        },
        metadata: Metadata::new(),
    }
}

/// Strategy: a ledger of dues as (original_cents, paid_cents_fraction).
fn ledger() -> impl Strategy<Value = Vec<(i64, i64)>> {
    proptest::collection::vec((100i64..1_000_000, 0i64..=100), 1..12)
}

/// Strategy: for each due, the fraction (in percent) of its balance to
/// allocate in the batch. Zero-percent entries are skipped.
fn fractions(len: usize) -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(0i64..=100, len..=len)
}

fn build_dues(ledger: &[(i64, i64)]) -> Vec<FeeDue> {
    ledger
        .iter()
        .enumerate()
        .map(|(i, &(original, paid_pct))| {
            let balance = original - original * paid_pct / 100;
            make_due(i, original, balance, 30)
        })
        .collect()
}

proptest! {
    /// For every due in a successful plan, new balance = old balance minus
    /// the amounts allocated to it, and it never dips below zero. The plan
    /// total equals the sum of its parts.
    #[test]
    fn allocation_conserves_money((entries, pcts) in ledger().prop_flat_map(|l| {
        let len = l.len();
        (Just(l), fractions(len))
    })) {
        let dues = build_dues(&entries);

        let requests: Vec<AllocationRequest> = dues
            .iter()
            .zip(&pcts)
            .filter_map(|(due, &pct)| {
                let amount = (due.balance_amount * Decimal::new(pct, 0) / Decimal::ONE_HUNDRED)
                    .round_dp(2);
                (amount > Decimal::ZERO).then_some(AllocationRequest {
                    due_id: due.id,
                    amount,
                })
            })
            .collect();
        prop_assume!(!requests.is_empty());

        let batch_total: Decimal = requests.iter().map(|r| r.amount).sum();
        let payment = PaymentSnapshot {
            id: Uuid::from_u128(7777),
            total_amount: batch_total,
            allocated_amount: Decimal::ZERO,
        };

        let plan = plan_allocation(&payment, &dues, &requests, today()).unwrap();

        prop_assert_eq!(plan.total_allocated, batch_total);
        let update_total: Decimal = plan.updates.iter().map(|u| u.amount).sum();
        prop_assert_eq!(update_total, batch_total);

        let allocated_per_due: HashMap<Uuid, Decimal> =
            requests.iter().fold(HashMap::new(), |mut acc, r| {
                *acc.entry(r.due_id).or_insert(Decimal::ZERO) += r.amount;
                acc
            });
        for due in &dues {
            let Some(&allocated) = allocated_per_due.get(&due.id) else { continue };
            let final_balance = plan
                .updates
                .iter()
                .rev()
                .find(|u| u.due_id == due.id)
                .map(|u| u.new_balance)
                .unwrap();
            prop_assert_eq!(final_balance, due.balance_amount - allocated);
            prop_assert!(final_balance >= Decimal::ZERO);
        }
    }

    /// A batch with one over-drawing request fails as a whole, regardless
    /// of how many valid requests precede it.
    #[test]
    fn over_allocation_fails_whole_batch(
        (entries, pcts) in ledger().prop_flat_map(|l| {
            let len = l.len();
            (Just(l), fractions(len))
        }),
        excess_cents in 1i64..10_000,
    ) {
        let dues = build_dues(&entries);

        let mut requests: Vec<AllocationRequest> = dues
            .iter()
            .zip(&pcts)
            .filter_map(|(due, &pct)| {
                let amount = (due.balance_amount * Decimal::new(pct, 0) / Decimal::ONE_HUNDRED)
                    .round_dp(2);
                (amount > Decimal::ZERO).then_some(AllocationRequest {
                    due_id: due.id,
                    amount,
                })
            })
            .collect();

        // Poison the batch: the last due gets its full remaining balance
        // plus a positive excess.
        let victim = dues.last().unwrap();
        let already: Decimal = requests
            .iter()
            .filter(|r| r.due_id == victim.id)
            .map(|r| r.amount)
            .sum();
        requests.push(AllocationRequest {
            due_id: victim.id,
            amount: victim.balance_amount - already + Decimal::new(excess_cents, 2),
        });

        let batch_total: Decimal = requests.iter().map(|r| r.amount).sum();
        let payment = PaymentSnapshot {
            id: Uuid::from_u128(7777),
            total_amount: batch_total,
            allocated_amount: Decimal::ZERO,
        };

        let result = plan_allocation(&payment, &dues, &requests, today());
        let is_over_allocation = matches!(result, Err(FeeError::OverAllocation { .. }));
        prop_assert!(is_over_allocation);
    }

    /// Every eligible due lands in exactly one aging bucket: the union of
    /// bucket counts equals the eligible count, overall and per type.
    #[test]
    fn aging_buckets_partition_eligible_dues(
        entries in proptest::collection::vec((100i64..100_000, 0i64..=100, -400i64..120), 0..40),
    ) {
        let dues: Vec<FeeDue> = entries
            .iter()
            .enumerate()
            .map(|(i, &(original, paid_pct, days_offset))| {
                let balance = original - original * paid_pct / 100;
                make_due(i, original, balance, days_offset)
            })
            .collect();

        let report = age_overdue(&dues, today());

        let eligible = dues
            .iter()
            .filter(|d| {
                d.balance_amount > Decimal::ZERO
                    && d.status != DueStatus::Waived
                    && d.due_date < today()
            })
            .count();

        let overall_count: usize = report.overall.iter().map(|b| b.count).sum();
        prop_assert_eq!(overall_count, eligible);
        prop_assert_eq!(report.due_count, eligible);

        let per_type_count: usize = report
            .by_type
            .iter()
            .flat_map(|t| t.buckets.iter())
            .map(|b| b.count)
            .sum();
        prop_assert_eq!(per_type_count, eligible);
    }
}
