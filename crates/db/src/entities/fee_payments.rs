//! `SeaORM` Entity for the fee_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

/// A payment receipt.
///
/// `total_amount` = `amount_paid` + `late_fee` - `discount_amount`; the
/// allocatable value of the receipt.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    /// Payment ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The paying student.
    pub student_id: Uuid,
    /// Optional structure reference when the payment targets one fee.
    pub fee_structure_id: Option<Uuid>,
    /// The cash amount received.
    pub amount_paid: Decimal,
    /// Discount granted on this payment.
    pub discount_amount: Decimal,
    /// Late fee charged on this payment.
    pub late_fee: Decimal,
    /// Allocatable total.
    pub total_amount: Decimal,
    /// The date the payment was received.
    pub payment_date: Date,
    /// Settlement status.
    pub payment_status: PaymentStatus,
    /// Payment method label (e.g. "cash", "bank_transfer").
    pub payment_method: String,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Allocations distributing this payment.
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
