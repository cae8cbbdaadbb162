//! Fee dues ledger logic.
//!
//! This module implements the dues engine:
//! - Domain types for dues, payments, and allocations
//! - Status derivation (one pure function, used everywhere balance changes)
//! - Payment allocation planning with money-conservation invariants
//! - Waivers with merged audit metadata
//! - Per-type summaries and overdue aging buckets

pub mod aging;
pub mod allocation;
pub mod error;
pub mod service;
pub mod status;
pub mod types;

#[cfg(test)]
mod service_props;

pub use aging::age_overdue;
pub use allocation::plan_allocation;
pub use error::FeeError;
pub use service::{DuesService, META_WAIVED_AT, META_WAIVED_BY, META_WAIVED_REASON};
pub use status::{derive_status, effective_status};
pub use types::{
    AgeBand, AgingBucket, AgingReport, AllocationPlan, AllocationRequest, DueStatus, DueUpdate,
    DuesReport, DuesSummary, FeeDue, FeeTypeAging, FeeTypeSummary, PaymentSnapshot, WaiverOutcome,
};
