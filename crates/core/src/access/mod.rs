//! Branch-scoped access control.
//!
//! This module implements the access resolution used by every query path:
//! - Actor and role definitions
//! - The `AccessScope` value (all branches, or an explicit branch set)
//! - The resolver computing a scope from an actor and the branch hierarchy
//!
//! The resolver is total: it always returns a scope and never errors.
//! Missing hierarchy or permission data degrades to the most restrictive
//! safe scope, because a false "no access" is safe while a false "full
//! access" is a security defect.

pub mod resolver;
pub mod types;

#[cfg(test)]
mod resolver_props;

pub use resolver::AccessResolver;
pub use types::{
    AccessScope, Actor, CROSS_BRANCH_ACCESS, MANAGE_ALL_BRANCHES, UserRole, VIEW_ALL_BRANCHES,
};
