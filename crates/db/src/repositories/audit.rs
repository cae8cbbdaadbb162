//! Audit log repository.
//!
//! Append-only sink. Callers treat writes as fire-and-forget: a failed
//! audit insert is logged by the caller and never blocks the primary
//! mutation it describes.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::audit_logs;

/// Audit repository for append-only event records.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one audit record.
    pub async fn record(
        &self,
        kind: &str,
        subject_id: Uuid,
        actor_id: Option<Uuid>,
        payload: Value,
    ) -> Result<audit_logs::Model, DbErr> {
        audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(kind.to_string()),
            subject_id: Set(subject_id),
            actor_id: Set(actor_id),
            payload: Set(payload),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }
}
