//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod audit;
pub mod branch;
pub mod fee;
pub mod permission;
pub mod session;
pub mod user;

pub use audit::AuditRepository;
pub use branch::BranchRepository;
pub use fee::{DueFilter, FeeRepository, FeeRepositoryError, ReportFilter, StudentDues};
pub use permission::PermissionRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
