//! Status derivation for fee dues.
//!
//! Status is a function of balance and due date, computed in exactly one
//! place so the stored column and the balance can never drift apart.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{DueStatus, FeeDue};

/// Derives a due's status from its balance and due date.
///
/// - Zero balance: `Paid` (waivers set `Waived` explicitly; derivation
///   never produces it).
/// - Outstanding balance past the due date: `Overdue`.
/// - Untouched balance: `Pending`; anything in between: `PartiallyPaid`.
#[must_use]
pub fn derive_status(
    balance: Decimal,
    original: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> DueStatus {
    if balance <= Decimal::ZERO {
        DueStatus::Paid
    } else if due_date < today {
        DueStatus::Overdue
    } else if balance >= original {
        DueStatus::Pending
    } else {
        DueStatus::PartiallyPaid
    }
}

/// Re-derives a due's effective status at read time.
///
/// Waived dues keep their terminal status; everything else is recomputed
/// against `today`, which is how `Overdue` surfaces without ever being a
/// stored transition.
#[must_use]
pub fn effective_status(due: &FeeDue, today: NaiveDate) -> DueStatus {
    if due.status == DueStatus::Waived {
        DueStatus::Waived
    } else {
        derive_status(due.balance_amount, due.original_amount, due.due_date, today)
    }
}
