//! `SeaORM` Entity for the fee_structures table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FeeRecurrence;

/// An obligation template: what a grade at a branch owes for a year.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    /// Fee structure ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The branch this structure belongs to.
    pub branch_id: Uuid,
    /// Grade the structure applies to.
    pub grade: String,
    /// Fee type label (e.g. "tuition", "transport").
    pub fee_type: String,
    /// Amount owed per instance.
    pub amount: Decimal,
    /// Academic year label.
    pub academic_year: String,
    /// Baseline due date for instances.
    pub due_date: Date,
    /// How often the fee recurs.
    pub recurrence: FeeRecurrence,
    /// Whether new dues may be raised from this structure.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning branch.
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branch,
    /// Dues raised from this structure.
    #[sea_orm(has_many = "super::fee_dues::Entity")]
    FeeDues,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::fee_dues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeDues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
