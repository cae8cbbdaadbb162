//! Payment allocation planning.
//!
//! A payment's value may be distributed across several outstanding dues in
//! one batch. Planning validates the whole batch against the payment's
//! unallocated value and each due's running balance, and produces the
//! per-due updates for the database layer to apply atomically. Any
//! violation fails the entire batch; a plan is all-or-nothing by
//! construction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use super::error::FeeError;
use super::status::derive_status;
use super::types::{AllocationPlan, AllocationRequest, DueUpdate, FeeDue, PaymentSnapshot};

/// Validates an allocation batch and resolves the per-due updates.
///
/// `dues` is the set of obligations the requests may reference, loaded by
/// the caller. Requests apply in order; a due named twice is paid down
/// against its running balance. Statuses are derived from the new balances
/// against `today`.
///
/// # Errors
///
/// - `EmptyAllocation` for an empty batch
/// - `ZeroAmount` / `NegativeAmount` for non-positive amounts
/// - `AllocationExceedsPayment` when the batch total exceeds the payment's
///   unallocated value
/// - `DueNotFound` when a request names a due outside `dues`
/// - `OverAllocation` when a request exceeds a due's remaining balance
///   (never silently truncated)
pub fn plan_allocation(
    payment: &PaymentSnapshot,
    dues: &[FeeDue],
    requests: &[AllocationRequest],
    today: NaiveDate,
) -> Result<AllocationPlan, FeeError> {
    if requests.is_empty() {
        return Err(FeeError::EmptyAllocation);
    }

    // 1. Validate amounts and the batch total against the payment.
    let mut total = Decimal::ZERO;
    for request in requests {
        if request.amount == Decimal::ZERO {
            return Err(FeeError::ZeroAmount);
        }
        if request.amount < Decimal::ZERO {
            return Err(FeeError::NegativeAmount);
        }
        total += request.amount;
    }

    let available = payment.remaining();
    if total > available {
        return Err(FeeError::AllocationExceedsPayment {
            requested: total,
            available,
        });
    }

    // 2. Resolve each request against the running balances.
    let by_id: HashMap<Uuid, &FeeDue> = dues.iter().map(|d| (d.id, d)).collect();
    let mut balances: HashMap<Uuid, Decimal> = HashMap::with_capacity(by_id.len());
    let mut updates = Vec::with_capacity(requests.len());

    for request in requests {
        let due = by_id
            .get(&request.due_id)
            .ok_or(FeeError::DueNotFound(request.due_id))?;

        let balance = *balances.entry(due.id).or_insert(due.balance_amount);
        if request.amount > balance {
            return Err(FeeError::OverAllocation {
                due_id: due.id,
                requested: request.amount,
                balance,
            });
        }

        let new_balance = balance - request.amount;
        balances.insert(due.id, new_balance);

        updates.push(DueUpdate {
            due_id: due.id,
            amount: request.amount,
            previous_balance: balance,
            new_balance,
            new_status: derive_status(new_balance, due.original_amount, due.due_date, today),
        });
    }

    Ok(AllocationPlan {
        payment_id: payment.id,
        total_allocated: total,
        updates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::types::DueStatus;
    use rust_decimal_macros::dec;
    use sekolah_shared::Metadata;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 8, 1)
    }

    fn make_due(original: Decimal, balance: Decimal) -> FeeDue {
        FeeDue {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            fee_structure_id: Uuid::new_v4(),
            fee_type: "tuition".to_string(),
            academic_year: "2026/2027".to_string(),
            current_grade: Some("7".to_string()),
            due_date: date(2026, 9, 15),
            original_amount: original,
            balance_amount: balance,
            status: if balance == original {
                DueStatus::Pending
            } else {
                DueStatus::PartiallyPaid
            },
            metadata: Metadata::new(),
        }
    }

    fn make_payment(total: Decimal, allocated: Decimal) -> PaymentSnapshot {
        PaymentSnapshot {
            id: Uuid::new_v4(),
            total_amount: total,
            allocated_amount: allocated,
        }
    }

    #[test]
    fn test_partial_then_full_settlement() {
        let due = make_due(dec!(1000), dec!(1000));
        let payment = make_payment(dec!(1500), dec!(0));

        let plan = plan_allocation(
            &payment,
            &[due.clone()],
            &[AllocationRequest {
                due_id: due.id,
                amount: dec!(400),
            }],
            today(),
        )
        .unwrap();

        assert_eq!(plan.total_allocated, dec!(400));
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].new_balance, dec!(600));
        assert_eq!(plan.updates[0].new_status, DueStatus::PartiallyPaid);

        // Settle the remainder.
        let mut due = due;
        due.balance_amount = dec!(600);
        due.status = DueStatus::PartiallyPaid;

        let plan = plan_allocation(
            &payment,
            &[due.clone()],
            &[AllocationRequest {
                due_id: due.id,
                amount: dec!(600),
            }],
            today(),
        )
        .unwrap();

        assert_eq!(plan.updates[0].new_balance, dec!(0));
        assert_eq!(plan.updates[0].new_status, DueStatus::Paid);
    }

    #[test]
    fn test_allocation_against_settled_due_fails() {
        let due = make_due(dec!(1000), dec!(0));
        let payment = make_payment(dec!(500), dec!(0));

        let result = plan_allocation(
            &payment,
            &[due.clone()],
            &[AllocationRequest {
                due_id: due.id,
                amount: dec!(0.01),
            }],
            today(),
        );

        assert!(matches!(result, Err(FeeError::OverAllocation { .. })));
    }

    #[test]
    fn test_batch_across_multiple_dues() {
        let first = make_due(dec!(300), dec!(300));
        let second = make_due(dec!(500), dec!(500));
        let payment = make_payment(dec!(600), dec!(0));

        let plan = plan_allocation(
            &payment,
            &[first.clone(), second.clone()],
            &[
                AllocationRequest {
                    due_id: first.id,
                    amount: dec!(300),
                },
                AllocationRequest {
                    due_id: second.id,
                    amount: dec!(300),
                },
            ],
            today(),
        )
        .unwrap();

        assert_eq!(plan.total_allocated, dec!(600));
        assert_eq!(plan.updates[0].new_status, DueStatus::Paid);
        assert_eq!(plan.updates[1].new_balance, dec!(200));
        assert_eq!(plan.updates[1].new_status, DueStatus::PartiallyPaid);
    }

    #[test]
    fn test_batch_total_exceeding_payment_fails() {
        let due = make_due(dec!(1000), dec!(1000));
        let payment = make_payment(dec!(500), dec!(200));

        let result = plan_allocation(
            &payment,
            &[due.clone()],
            &[AllocationRequest {
                due_id: due.id,
                amount: dec!(400),
            }],
            today(),
        );

        assert!(matches!(
            result,
            Err(FeeError::AllocationExceedsPayment {
                requested,
                available,
            }) if requested == dec!(400) && available == dec!(300)
        ));
    }

    #[test]
    fn test_over_allocation_fails_whole_batch() {
        let first = make_due(dec!(300), dec!(300));
        let second = make_due(dec!(100), dec!(50));
        let payment = make_payment(dec!(1000), dec!(0));

        // Second request over-draws; the plan (and thus the whole batch)
        // must fail, leaving nothing to apply.
        let result = plan_allocation(
            &payment,
            &[first.clone(), second.clone()],
            &[
                AllocationRequest {
                    due_id: first.id,
                    amount: dec!(300),
                },
                AllocationRequest {
                    due_id: second.id,
                    amount: dec!(60),
                },
            ],
            today(),
        );

        assert!(matches!(
            result,
            Err(FeeError::OverAllocation { due_id, .. }) if due_id == second.id
        ));
    }

    #[test]
    fn test_duplicate_due_in_batch_uses_running_balance() {
        let due = make_due(dec!(500), dec!(500));
        let payment = make_payment(dec!(600), dec!(0));

        let plan = plan_allocation(
            &payment,
            &[due.clone()],
            &[
                AllocationRequest {
                    due_id: due.id,
                    amount: dec!(200),
                },
                AllocationRequest {
                    due_id: due.id,
                    amount: dec!(300),
                },
            ],
            today(),
        )
        .unwrap();

        assert_eq!(plan.updates[0].previous_balance, dec!(500));
        assert_eq!(plan.updates[0].new_balance, dec!(300));
        assert_eq!(plan.updates[1].previous_balance, dec!(300));
        assert_eq!(plan.updates[1].new_balance, dec!(0));
        assert_eq!(plan.updates[1].new_status, DueStatus::Paid);
    }

    #[test]
    fn test_duplicate_due_over_running_balance_fails() {
        let due = make_due(dec!(500), dec!(500));
        let payment = make_payment(dec!(1000), dec!(0));

        let result = plan_allocation(
            &payment,
            &[due.clone()],
            &[
                AllocationRequest {
                    due_id: due.id,
                    amount: dec!(400),
                },
                AllocationRequest {
                    due_id: due.id,
                    amount: dec!(200),
                },
            ],
            today(),
        );

        assert!(matches!(result, Err(FeeError::OverAllocation { .. })));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let payment = make_payment(dec!(100), dec!(0));
        assert!(matches!(
            plan_allocation(&payment, &[], &[], today()),
            Err(FeeError::EmptyAllocation)
        ));
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        let due = make_due(dec!(100), dec!(100));
        let payment = make_payment(dec!(100), dec!(0));

        assert!(matches!(
            plan_allocation(
                &payment,
                &[due.clone()],
                &[AllocationRequest {
                    due_id: due.id,
                    amount: dec!(0),
                }],
                today(),
            ),
            Err(FeeError::ZeroAmount)
        ));

        assert!(matches!(
            plan_allocation(
                &payment,
                &[due.clone()],
                &[AllocationRequest {
                    due_id: due.id,
                    amount: dec!(-5),
                }],
                today(),
            ),
            Err(FeeError::NegativeAmount)
        ));
    }

    #[test]
    fn test_unknown_due_rejected() {
        let due = make_due(dec!(100), dec!(100));
        let payment = make_payment(dec!(100), dec!(0));
        let stranger = Uuid::new_v4();

        assert!(matches!(
            plan_allocation(
                &payment,
                &[due],
                &[AllocationRequest {
                    due_id: stranger,
                    amount: dec!(10),
                }],
                today(),
            ),
            Err(FeeError::DueNotFound(id)) if id == stranger
        ));
    }

    #[test]
    fn test_allocation_on_past_due_derives_overdue_until_settled() {
        let mut due = make_due(dec!(1000), dec!(1000));
        due.due_date = date(2026, 6, 1);
        let payment = make_payment(dec!(1000), dec!(0));

        let plan = plan_allocation(
            &payment,
            &[due.clone()],
            &[AllocationRequest {
                due_id: due.id,
                amount: dec!(400),
            }],
            today(),
        )
        .unwrap();

        // Still outstanding past the due date: derivation keeps it overdue.
        assert_eq!(plan.updates[0].new_status, DueStatus::Overdue);
    }
}
