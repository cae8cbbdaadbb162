//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role stored on the users table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to every branch.
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    /// Administers a branch subtree.
    #[sea_orm(string_value = "branch_admin")]
    BranchAdmin,
    /// Manages fees and payments.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Teaching staff.
    #[sea_orm(string_value = "teacher")]
    Teacher,
    /// General staff.
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl From<UserRole> for sekolah_core::access::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::SuperAdmin => Self::SuperAdmin,
            UserRole::BranchAdmin => Self::BranchAdmin,
            UserRole::Accountant => Self::Accountant,
            UserRole::Teacher => Self::Teacher,
            UserRole::Staff => Self::Staff,
        }
    }
}

impl From<sekolah_core::access::UserRole> for UserRole {
    fn from(role: sekolah_core::access::UserRole) -> Self {
        use sekolah_core::access::UserRole as Core;
        match role {
            Core::SuperAdmin => Self::SuperAdmin,
            Core::BranchAdmin => Self::BranchAdmin,
            Core::Accountant => Self::Accountant,
            Core::Teacher => Self::Teacher,
            Core::Staff => Self::Staff,
        }
    }
}

/// Fee due status stored on the fee_dues table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "due_status")]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Nothing paid yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially settled.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Administratively cancelled.
    #[sea_orm(string_value = "waived")]
    Waived,
    /// Outstanding past its due date.
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl From<DueStatus> for sekolah_core::fees::DueStatus {
    fn from(status: DueStatus) -> Self {
        match status {
            DueStatus::Pending => Self::Pending,
            DueStatus::PartiallyPaid => Self::PartiallyPaid,
            DueStatus::Paid => Self::Paid,
            DueStatus::Waived => Self::Waived,
            DueStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<sekolah_core::fees::DueStatus> for DueStatus {
    fn from(status: sekolah_core::fees::DueStatus) -> Self {
        use sekolah_core::fees::DueStatus as Core;
        match status {
            Core::Pending => Self::Pending,
            Core::PartiallyPaid => Self::PartiallyPaid,
            Core::Paid => Self::Paid,
            Core::Waived => Self::Waived,
            Core::Overdue => Self::Overdue,
        }
    }
}

/// Payment settlement status on the fee_payments table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Settled and allocatable.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Recorded but not yet settled.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settlement failed.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Returned to the payer.
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// Recurrence of a fee structure.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_recurrence")]
#[serde(rename_all = "snake_case")]
pub enum FeeRecurrence {
    /// Charged once.
    #[sea_orm(string_value = "one_time")]
    OneTime,
    /// Charged monthly.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Charged quarterly.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Charged annually.
    #[sea_orm(string_value = "annual")]
    Annual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_core() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::BranchAdmin,
            UserRole::Accountant,
            UserRole::Teacher,
            UserRole::Staff,
        ] {
            let core: sekolah_core::access::UserRole = role.clone().into();
            assert_eq!(UserRole::from(core), role);
        }
    }

    #[test]
    fn test_due_status_round_trip_through_core() {
        for status in [
            DueStatus::Pending,
            DueStatus::PartiallyPaid,
            DueStatus::Paid,
            DueStatus::Waived,
            DueStatus::Overdue,
        ] {
            let core: sekolah_core::fees::DueStatus = status.clone().into();
            assert_eq!(DueStatus::from(core), status);
        }
    }
}
