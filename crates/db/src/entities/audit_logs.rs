//! `SeaORM` Entity for the audit_logs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An append-only audit record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    /// Audit record ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Record kind (e.g. "waiver").
    pub kind: String,
    /// The entity the record is about.
    pub subject_id: Uuid,
    /// The acting user, when known.
    pub actor_id: Option<Uuid>,
    /// Structured event payload.
    pub payload: Json,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
