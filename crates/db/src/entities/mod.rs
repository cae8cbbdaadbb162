//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod branches;
pub mod fee_dues;
pub mod fee_payments;
pub mod fee_structures;
pub mod payment_allocations;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod user_roles;
pub mod users;
