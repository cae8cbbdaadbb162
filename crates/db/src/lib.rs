//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Branch-scope query filtering
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod scope;

pub use repositories::{
    AuditRepository, BranchRepository, FeeRepository, PermissionRepository, SessionRepository,
    UserRepository,
};
pub use scope::BranchScopeExt;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
