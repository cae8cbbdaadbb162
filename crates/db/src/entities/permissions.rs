//! `SeaORM` Entity for the permissions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single grantable capability, identified by slug.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    /// Permission ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Stable slug, e.g. `system.cross_branch_access`.
    #[sea_orm(unique)]
    pub slug: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Roles granting this permission.
    #[sea_orm(has_many = "super::role_permissions::Entity")]
    RolePermissions,
}

impl Related<super::role_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
