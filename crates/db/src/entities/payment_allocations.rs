//! `SeaORM` Entity for the payment_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One slice of a payment applied to one due.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_allocations")]
pub struct Model {
    /// Allocation ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The payment the value comes from.
    pub payment_id: Uuid,
    /// The due the value is applied to.
    pub due_id: Uuid,
    /// The amount applied.
    pub amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The source payment.
    #[sea_orm(
        belongs_to = "super::fee_payments::Entity",
        from = "Column::PaymentId",
        to = "super::fee_payments::Column::Id"
    )]
    FeePayment,
    /// The target due.
    #[sea_orm(
        belongs_to = "super::fee_dues::Entity",
        from = "Column::DueId",
        to = "super::fee_dues::Column::Id"
    )]
    FeeDue,
}

impl Related<super::fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePayment.def()
    }
}

impl Related<super::fee_dues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeDue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
