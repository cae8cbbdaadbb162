//! Property-based tests for the access resolver.
//!
//! - Property 1: a branch admin's scope always contains their own branch
//! - Property 2: a branch admin's scope never reaches outside their subtree
//! - Property 3: resolution terminates on arbitrary (even cyclic) edge sets

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::resolver::AccessResolver;
use super::types::{AccessScope, Actor, UserRole};

/// Deterministic UUID for a node index so generated trees are reproducible.
fn node(i: usize) -> Uuid {
    Uuid::from_u128(u128::try_from(i).unwrap() + 1)
}

/// Strategy generating a rooted tree as a parent vector: node i+1 has a
/// parent chosen among nodes 0..=i, so the result is always acyclic.
fn parent_vector(max_nodes: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(proptest::num::usize::ANY, 1..max_nodes).prop_map(|raw| {
        raw.iter()
            .enumerate()
            .map(|(i, &pick)| pick % (i + 1))
            .collect()
    })
}

/// Builds the adjacency map for a parent vector.
fn adjacency(parents: &[usize]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (i, &parent) in parents.iter().enumerate() {
        children.entry(node(parent)).or_default().push(node(i + 1));
    }
    children
}

/// Reference closure: all nodes whose ancestor chain reaches `root`.
fn reference_closure(parents: &[usize], root: usize) -> HashSet<Uuid> {
    let mut members = HashSet::from([root]);
    // parents[i] is the parent of node i+1; a node is in the closure when
    // its parent already is, and the parent vector is topologically ordered.
    for (i, &parent) in parents.iter().enumerate() {
        if members.contains(&parent) {
            members.insert(i + 1);
        }
    }
    members.into_iter().map(node).collect()
}

proptest! {
    /// A branch admin's scope always includes their own branch, even when
    /// it has no descendants.
    #[test]
    fn branch_admin_scope_contains_home(parents in parent_vector(24), home_index in 0usize..24) {
        let home_index = home_index % (parents.len() + 1);
        let home = node(home_index);
        let children = adjacency(&parents);
        let actor = Actor::new(Uuid::new_v4(), UserRole::BranchAdmin, Some(home));

        let scope = AccessResolver::resolve_scope(Some(&actor), |b| {
            children.get(&b).cloned().unwrap_or_default()
        });

        prop_assert!(scope.allows(home));
    }

    /// The resolved scope is exactly the descendant closure of the home
    /// branch: nothing outside the subtree ever leaks in.
    #[test]
    fn branch_admin_scope_is_exactly_subtree(parents in parent_vector(24), home_index in 0usize..24) {
        let home_index = home_index % (parents.len() + 1);
        let children = adjacency(&parents);
        let actor = Actor::new(Uuid::new_v4(), UserRole::BranchAdmin, Some(node(home_index)));

        let scope = AccessResolver::resolve_scope(Some(&actor), |b| {
            children.get(&b).cloned().unwrap_or_default()
        });

        let expected = reference_closure(&parents, home_index);
        prop_assert_eq!(scope, AccessScope::Branches(expected));
    }

    /// Resolution terminates and stays within the known node set for
    /// arbitrary edge lists, including self-loops and cycles.
    #[test]
    fn resolution_is_total_on_arbitrary_edges(
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40),
        home_index in 0usize..12,
    ) {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (parent, child) in &edges {
            children.entry(node(*parent)).or_default().push(node(*child));
        }
        let actor = Actor::new(Uuid::new_v4(), UserRole::BranchAdmin, Some(node(home_index)));

        let scope = AccessResolver::resolve_scope(Some(&actor), |b| {
            children.get(&b).cloned().unwrap_or_default()
        });

        let AccessScope::Branches(ids) = scope else {
            return Err(TestCaseError::fail("branch admin scope must be explicit"));
        };
        prop_assert!(ids.contains(&node(home_index)));
        prop_assert!(ids.len() <= 13);
    }

    /// Super admins resolve to the all-branches sentinel regardless of the
    /// hierarchy contents.
    #[test]
    fn super_admin_always_all(edges in proptest::collection::vec((0usize..8, 0usize..8), 0..20)) {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (parent, child) in &edges {
            children.entry(node(*parent)).or_default().push(node(*child));
        }
        let actor = Actor::new(Uuid::new_v4(), UserRole::SuperAdmin, None);

        let scope = AccessResolver::resolve_scope(Some(&actor), |b| {
            children.get(&b).cloned().unwrap_or_default()
        });
        prop_assert!(scope.is_all());
    }
}
