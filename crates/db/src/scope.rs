//! Branch-scope query filtering.
//!
//! Applies a resolved `AccessScope` to any `SeaORM` query. The contract is
//! fail-closed: an unrestricted scope leaves the query untouched, an
//! explicit scope narrows it with an `IN` predicate, and an empty scope
//! yields zero rows — absence of access must produce absence of results,
//! never an error and never unfiltered data.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, QueryFilter};
use sekolah_core::access::AccessScope;

/// Extension applying a branch scope to a query.
pub trait BranchScopeExt: QueryFilter + Sized {
    /// Restricts the query to rows whose `column` falls inside `scope`.
    #[must_use]
    fn in_branch_scope<C: ColumnTrait>(self, scope: &AccessScope, column: C) -> Self {
        match scope {
            AccessScope::All => self,
            AccessScope::Branches(ids) if ids.is_empty() => {
                // No access: an always-false predicate, so the query shape
                // stays valid but matches nothing.
                self.filter(Expr::value(false))
            }
            AccessScope::Branches(ids) => self.filter(column.is_in(ids.iter().copied())),
        }
    }
}

impl<Q: QueryFilter + Sized> BranchScopeExt for Q {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fee_structures;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn sql(query: sea_orm::Select<fee_structures::Entity>) -> String {
        query.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_all_scope_is_a_no_op() {
        let unscoped = sql(fee_structures::Entity::find());
        let scoped = sql(
            fee_structures::Entity::find()
                .in_branch_scope(&AccessScope::All, fee_structures::Column::BranchId),
        );
        assert_eq!(unscoped, scoped);
    }

    #[test]
    fn test_explicit_scope_adds_in_predicate() {
        let branch = Uuid::new_v4();
        let scope = AccessScope::Branches(HashSet::from([branch]));
        let rendered = sql(
            fee_structures::Entity::find()
                .in_branch_scope(&scope, fee_structures::Column::BranchId),
        );
        assert!(rendered.contains("\"branch_id\" IN"));
        assert!(rendered.contains(&branch.to_string()));
    }

    #[test]
    fn test_empty_scope_matches_nothing() {
        let rendered = sql(
            fee_structures::Entity::find()
                .in_branch_scope(&AccessScope::none(), fee_structures::Column::BranchId),
        );
        assert!(rendered.contains("FALSE"));
    }
}
