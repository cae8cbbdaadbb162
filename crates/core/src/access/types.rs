//! Actor, role, and scope types for access resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Permission slug granting read/write access across branches.
pub const CROSS_BRANCH_ACCESS: &str = "system.cross_branch_access";

/// Permission slug granting management rights over all branches.
pub const MANAGE_ALL_BRANCHES: &str = "system.manage_all_branches";

/// Permission slug granting read access across all branches.
pub const VIEW_ALL_BRANCHES: &str = "system.view_all_branches";

/// Permission slugs that widen a non-admin actor's scope to all branches.
pub const CROSS_BRANCH_SLUGS: [&str; 3] =
    [CROSS_BRANCH_ACCESS, MANAGE_ALL_BRANCHES, VIEW_ALL_BRANCHES];

/// User roles within the school system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to every branch.
    SuperAdmin,
    /// Administers their home branch and all branches beneath it.
    BranchAdmin,
    /// Manages fees and payments within their scope.
    Accountant,
    /// Teaching staff, scoped to their home branch.
    Teacher,
    /// General staff, scoped to their home branch.
    Staff,
}

impl UserRole {
    /// Returns the stable slug used in tokens and the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::BranchAdmin => "branch_admin",
            Self::Accountant => "accountant",
            Self::Teacher => "teacher",
            Self::Staff => "staff",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "branch_admin" => Ok(Self::BranchAdmin),
            "accountant" => Ok(Self::Accountant),
            "teacher" => Ok(Self::Teacher),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// An authenticated actor as seen by the resolver.
///
/// Threaded explicitly into every resolver call; there is no ambient
/// "current user" state.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The user's ID.
    pub user_id: Uuid,
    /// The user's role.
    pub role: UserRole,
    /// Home branch; None for super admins and misconfigured accounts.
    pub branch_id: Option<Uuid>,
    /// Effective permission slugs, resolved from the user's roles.
    pub permissions: HashSet<String>,
}

impl Actor {
    /// Creates an actor with no extra permissions.
    #[must_use]
    pub fn new(user_id: Uuid, role: UserRole, branch_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            branch_id,
            permissions: HashSet::new(),
        }
    }

    /// Returns true if the actor holds the given permission slug.
    #[must_use]
    pub fn has_permission(&self, slug: &str) -> bool {
        self.permissions.contains(slug)
    }

    /// Returns true if the actor holds any of the given permission slugs.
    #[must_use]
    pub fn has_any_permission(&self, slugs: &[&str]) -> bool {
        slugs.iter().any(|slug| self.has_permission(slug))
    }
}

/// The set of branches an actor may operate on.
///
/// Either the sentinel "all branches" or an explicit, deduplicated set of
/// branch IDs. An empty set means no access at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Unrestricted: every branch, current and future.
    All,
    /// An explicit set of branch IDs; empty means no access.
    Branches(HashSet<Uuid>),
}

impl AccessScope {
    /// The empty scope: no access to any branch.
    #[must_use]
    pub fn none() -> Self {
        Self::Branches(HashSet::new())
    }

    /// A scope containing exactly one branch.
    #[must_use]
    pub fn single(branch_id: Uuid) -> Self {
        Self::Branches(HashSet::from([branch_id]))
    }

    /// Returns true if this scope covers all branches.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns true if this scope grants no access at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Branches(ids) => ids.is_empty(),
        }
    }

    /// Returns true if the scope permits access to the given branch.
    #[must_use]
    pub fn allows(&self, branch_id: Uuid) -> bool {
        match self {
            Self::All => true,
            Self::Branches(ids) => ids.contains(&branch_id),
        }
    }

    /// Returns the explicit branch set, or None for the all-branches sentinel.
    #[must_use]
    pub const fn branch_ids(&self) -> Option<&HashSet<Uuid>> {
        match self {
            Self::All => None,
            Self::Branches(ids) => Some(ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_slug_round_trip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::BranchAdmin,
            UserRole::Accountant,
            UserRole::Teacher,
            UserRole::Staff,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("principal".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_scope_none_is_empty() {
        let scope = AccessScope::none();
        assert!(scope.is_empty());
        assert!(!scope.is_all());
        assert!(!scope.allows(Uuid::new_v4()));
    }

    #[test]
    fn test_scope_all_allows_everything() {
        let scope = AccessScope::All;
        assert!(scope.is_all());
        assert!(!scope.is_empty());
        assert!(scope.allows(Uuid::new_v4()));
        assert!(scope.branch_ids().is_none());
    }

    #[test]
    fn test_scope_single() {
        let branch = Uuid::new_v4();
        let scope = AccessScope::single(branch);
        assert!(scope.allows(branch));
        assert!(!scope.allows(Uuid::new_v4()));
    }

    #[test]
    fn test_actor_permission_checks() {
        let mut actor = Actor::new(Uuid::new_v4(), UserRole::Staff, None);
        assert!(!actor.has_any_permission(&CROSS_BRANCH_SLUGS));

        actor.permissions.insert(VIEW_ALL_BRANCHES.to_string());
        assert!(actor.has_permission(VIEW_ALL_BRANCHES));
        assert!(actor.has_any_permission(&CROSS_BRANCH_SLUGS));
        assert!(!actor.has_permission(MANAGE_ALL_BRANCHES));
    }
}
