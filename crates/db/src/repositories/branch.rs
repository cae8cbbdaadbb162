//! Branch repository: hierarchy reads and scope resolution.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use sekolah_core::access::{AccessResolver, AccessScope, Actor, UserRole};
use sekolah_shared::{PageRequest, PageResponse};

use crate::entities::branches;
use crate::scope::BranchScopeExt;

/// Branch repository for hierarchy and listing operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    db: DatabaseConnection,
}

impl BranchRepository {
    /// Creates a new branch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the direct, non-deleted children of a branch.
    ///
    /// An unknown branch simply has no children; the hierarchy read never
    /// fails scope resolution.
    pub async fn children_of(&self, parent_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        let rows: Vec<Uuid> = branches::Entity::find()
            .select_only()
            .column(branches::Column::Id)
            .filter(branches::Column::ParentBranchId.eq(parent_id))
            .filter(branches::Column::IsDeleted.eq(false))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Loads the full child adjacency of the hierarchy in one query.
    ///
    /// Branch counts are small (tens of campuses), so the resolver walks an
    /// in-memory snapshot instead of issuing per-level queries.
    pub async fn children_map(&self) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let rows: Vec<(Uuid, Option<Uuid>)> = branches::Entity::find()
            .select_only()
            .column(branches::Column::Id)
            .column(branches::Column::ParentBranchId)
            .filter(branches::Column::IsDeleted.eq(false))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (id, parent) in rows {
            if let Some(parent) = parent {
                children.entry(parent).or_default().push(id);
            }
        }
        Ok(children)
    }

    /// Computes the descendant closure of a branch with batched frontier
    /// queries, one per tree level.
    ///
    /// No fixed depth: the loop runs until a level adds nothing new, and
    /// the visited set guards against corrupted (cyclic) hierarchies.
    pub async fn descendant_ids(&self, root: Uuid) -> Result<HashSet<Uuid>, DbErr> {
        let mut visited = HashSet::from([root]);
        let mut frontier = vec![root];

        while !frontier.is_empty() {
            let level: Vec<Uuid> = branches::Entity::find()
                .select_only()
                .column(branches::Column::Id)
                .filter(branches::Column::ParentBranchId.is_in(frontier.iter().copied()))
                .filter(branches::Column::IsDeleted.eq(false))
                .into_tuple()
                .all(&self.db)
                .await?;

            frontier = level
                .into_iter()
                .filter(|id| visited.insert(*id))
                .collect();
        }

        Ok(visited)
    }

    /// Returns true if the branch exists and is not soft-deleted.
    pub async fn exists_and_not_deleted(&self, id: Uuid) -> Result<bool, DbErr> {
        let found = branches::Entity::find_by_id(id)
            .filter(branches::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    /// Resolves the access scope for an actor.
    ///
    /// The hierarchy is only read for branch admins; every other case is a
    /// constant-time answer, so the common administrative paths skip the
    /// tree entirely.
    pub async fn resolve_scope(&self, actor: Option<&Actor>) -> Result<AccessScope, DbErr> {
        let needs_tree = matches!(
            actor,
            Some(a) if a.role == UserRole::BranchAdmin && a.branch_id.is_some()
        );

        if needs_tree {
            let children = self.children_map().await?;
            Ok(AccessResolver::resolve_scope(actor, |id| {
                children.get(&id).cloned().unwrap_or_default()
            }))
        } else {
            Ok(AccessResolver::resolve_scope(actor, |_| Vec::new()))
        }
    }

    /// Lists non-deleted branches visible to the given scope, paginated.
    pub async fn list_in_scope(
        &self,
        scope: &AccessScope,
        page: &PageRequest,
    ) -> Result<PageResponse<branches::Model>, DbErr> {
        let query = branches::Entity::find()
            .filter(branches::Column::IsDeleted.eq(false))
            .in_branch_scope(scope, branches::Column::Id);

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(branches::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds one branch, returning None when it is deleted or out of scope.
    pub async fn find_in_scope(
        &self,
        id: Uuid,
        scope: &AccessScope,
    ) -> Result<Option<branches::Model>, DbErr> {
        branches::Entity::find_by_id(id)
            .filter(branches::Column::IsDeleted.eq(false))
            .in_branch_scope(scope, branches::Column::Id)
            .one(&self.db)
            .await
    }
}
