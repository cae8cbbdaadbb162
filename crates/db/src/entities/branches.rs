//! `SeaORM` Entity for the branches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A school branch (campus), arranged in a tree under a parent branch.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    /// Branch ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short unique code.
    pub code: String,
    /// Parent branch; null for roots.
    pub parent_branch_id: Option<Uuid>,
    /// Soft-delete flag; deleted branches drop out of scope closures.
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Self-reference to the parent branch.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentBranchId",
        to = "Column::Id"
    )]
    Parent,
    /// Fee structures defined for this branch.
    #[sea_orm(has_many = "super::fee_structures::Entity")]
    FeeStructures,
    /// Users homed at this branch.
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructures.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
