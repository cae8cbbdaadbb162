//! Permission repository: effective permission slugs per user.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};
use std::collections::HashSet;
use uuid::Uuid;

use crate::entities::{permissions, role_permissions, user_roles};

/// Permission repository for role-based permission lookups.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    db: DatabaseConnection,
}

impl PermissionRepository {
    /// Creates a new permission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves the union of permission slugs granted to a user through
    /// their role assignments.
    ///
    /// Missing rows simply mean fewer permissions; the scope resolver
    /// treats the result as best-effort and degrades to a narrower scope.
    pub async fn permissions_of(&self, user_id: Uuid) -> Result<HashSet<String>, DbErr> {
        let role_ids: Vec<Uuid> = user_roles::Entity::find()
            .select_only()
            .column(user_roles::Column::RoleId)
            .filter(user_roles::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        if role_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let permission_ids: Vec<Uuid> = role_permissions::Entity::find()
            .select_only()
            .column(role_permissions::Column::PermissionId)
            .filter(role_permissions::Column::RoleId.is_in(role_ids))
            .into_tuple()
            .all(&self.db)
            .await?;

        if permission_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let slugs: Vec<String> = permissions::Entity::find()
            .select_only()
            .column(permissions::Column::Slug)
            .filter(permissions::Column::Id.is_in(permission_ids))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(slugs.into_iter().collect())
    }
}
