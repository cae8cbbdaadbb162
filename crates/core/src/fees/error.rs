//! Fee ledger error types.
//!
//! This module defines all errors that can occur in the dues engine:
//! allocation invariant violations, waiver state errors, and missing
//! references. Every failing operation is all-or-nothing; callers never
//! observe partial state after any of these errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::DueStatus;

/// Errors that can occur during fee ledger operations.
#[derive(Debug, Error)]
pub enum FeeError {
    // ========== Allocation Errors ==========
    /// Allocation batch contains no entries.
    #[error("Allocation batch must contain at least one entry")]
    EmptyAllocation,

    /// Allocation amount cannot be zero.
    #[error("Allocation amount cannot be zero")]
    ZeroAmount,

    /// Allocation amount cannot be negative.
    #[error("Allocation amount cannot be negative")]
    NegativeAmount,

    /// Batch total exceeds the payment's unallocated value.
    #[error("Allocation total {requested} exceeds unallocated payment value {available}")]
    AllocationExceedsPayment {
        /// The batch total requested.
        requested: Decimal,
        /// The payment value still available for allocation.
        available: Decimal,
    },

    /// A single allocation exceeds the due's remaining balance.
    #[error("Allocation of {requested} exceeds remaining balance {balance} on due {due_id}")]
    OverAllocation {
        /// The due being over-allocated.
        due_id: Uuid,
        /// The amount requested against it.
        requested: Decimal,
        /// The due's remaining balance.
        balance: Decimal,
    },

    // ========== Waiver Errors ==========
    /// Attempted waiver on a due already in a terminal state.
    #[error("Cannot waive a due in {0} state")]
    WaiveInvalidState(DueStatus),

    // ========== Reference Errors ==========
    /// Referenced due does not exist (or is outside the loaded set).
    #[error("Fee due not found: {0}")]
    DueNotFound(Uuid),

    /// Referenced payment does not exist.
    #[error("Fee payment not found: {0}")]
    PaymentNotFound(Uuid),
}

impl FeeError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAllocation => "EMPTY_ALLOCATION",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AllocationExceedsPayment { .. } => "ALLOCATION_EXCEEDS_PAYMENT",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::WaiveInvalidState(_) => "WAIVE_INVALID_STATE",
            Self::DueNotFound(_) => "DUE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::EmptyAllocation | Self::ZeroAmount | Self::NegativeAmount => 400,

            // 422 Unprocessable - ledger invariant violations
            Self::AllocationExceedsPayment { .. }
            | Self::OverAllocation { .. }
            | Self::WaiveInvalidState(_) => 422,

            // 404 Not Found
            Self::DueNotFound(_) | Self::PaymentNotFound(_) => 404,
        }
    }
}
