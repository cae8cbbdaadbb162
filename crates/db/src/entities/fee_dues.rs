//! `SeaORM` Entity for the fee_dues table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DueStatus;

/// A concrete fee obligation owed by one student.
///
/// The balance only moves through payment allocations or a waiver, and the
/// stored status always reflects the balance it was written with.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_dues")]
pub struct Model {
    /// Due ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The student owing this due.
    pub student_id: Uuid,
    /// The structure this due was raised from.
    pub fee_structure_id: Uuid,
    /// Fee type label, denormalized from the structure.
    pub fee_type: String,
    /// Academic year label.
    pub academic_year: String,
    /// The student's grade when the due was raised.
    pub current_grade: Option<String>,
    /// The date payment falls due.
    pub due_date: Date,
    /// The amount originally owed.
    pub original_amount: Decimal,
    /// The amount still owed.
    pub balance_amount: Decimal,
    /// Stored status; overdue is re-derived at read time.
    pub status: DueStatus,
    /// Free-form metadata; waiver audit fields live here.
    pub metadata: Json,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The structure this due was raised from.
    #[sea_orm(
        belongs_to = "super::fee_structures::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structures::Column::Id"
    )]
    FeeStructure,
    /// Allocations applied to this due.
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
