//! Scope resolution over the branch hierarchy.
//!
//! This module computes the set of branches an actor may operate on. It is
//! consulted before nearly every query, so it must be total: every input
//! resolves to a scope, and ambiguity (missing branch, missing permission
//! rows) degrades to the most restrictive safe answer.

use std::collections::HashSet;

use uuid::Uuid;

use super::types::{AccessScope, Actor, CROSS_BRANCH_SLUGS, MANAGE_ALL_BRANCHES, UserRole};

/// Access resolution over the branch tree.
///
/// This service contains pure logic with no database dependencies. The
/// branch hierarchy is injected as a `children_of` lookup returning the
/// direct, non-deleted children of a branch; an unknown branch yields no
/// children.
pub struct AccessResolver;

impl AccessResolver {
    /// Resolves the branch scope for an actor.
    ///
    /// - No actor (unauthenticated): empty scope, no access.
    /// - Super admins: all branches. Checked before any traversal since the
    ///   closure walk is O(descendants) and this is the common admin case.
    /// - Branch admins: the descendant closure of their home branch plus
    ///   the home branch itself; empty scope if they have no home branch.
    /// - Everyone else: all branches when a cross-branch permission is
    ///   held, otherwise just the home branch (or nothing).
    #[must_use]
    pub fn resolve_scope<F>(actor: Option<&Actor>, children_of: F) -> AccessScope
    where
        F: Fn(Uuid) -> Vec<Uuid>,
    {
        let Some(actor) = actor else {
            return AccessScope::none();
        };

        match actor.role {
            UserRole::SuperAdmin => AccessScope::All,
            UserRole::BranchAdmin => match actor.branch_id {
                Some(home) => AccessScope::Branches(Self::subtree(home, &children_of)),
                None => AccessScope::none(),
            },
            _ => {
                if actor.has_any_permission(&CROSS_BRANCH_SLUGS) {
                    AccessScope::All
                } else {
                    actor
                        .branch_id
                        .map_or_else(AccessScope::none, AccessScope::single)
                }
            }
        }
    }

    /// Returns true if the actor may read data belonging to the branch.
    #[must_use]
    pub fn can_access_branch<F>(actor: Option<&Actor>, branch_id: Uuid, children_of: F) -> bool
    where
        F: Fn(Uuid) -> Vec<Uuid>,
    {
        Self::resolve_scope(actor, children_of).allows(branch_id)
    }

    /// Returns true if the actor may manage (mutate) the branch.
    ///
    /// Holders of a manage-all capability pass immediately; everyone else
    /// falls back to the read check.
    #[must_use]
    pub fn can_manage_branch<F>(actor: Option<&Actor>, branch_id: Uuid, children_of: F) -> bool
    where
        F: Fn(Uuid) -> Vec<Uuid>,
    {
        match actor {
            None => false,
            Some(a) => {
                if a.role == UserRole::SuperAdmin || a.has_permission(MANAGE_ALL_BRANCHES) {
                    return true;
                }
                Self::can_access_branch(actor, branch_id, children_of)
            }
        }
    }

    /// Computes the closure of a branch over the parent-pointer relation.
    ///
    /// Explicit worklist BFS with a visited set: depth is unbounded and a
    /// corrupted hierarchy (cycle, dangling parent) must not loop or error.
    /// The root is always part of its own closure.
    fn subtree<F>(root: Uuid, children_of: &F) -> HashSet<Uuid>
    where
        F: Fn(Uuid) -> Vec<Uuid>,
    {
        let mut visited = HashSet::from([root]);
        let mut frontier = vec![root];

        while let Some(branch) = frontier.pop() {
            for child in children_of(branch) {
                if visited.insert(child) {
                    frontier.push(child);
                }
            }
        }

        visited
    }
}
