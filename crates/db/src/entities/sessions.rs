//! `SeaORM` Entity for the sessions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A refresh-token session.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Session ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The session's user.
    pub user_id: Uuid,
    /// SHA-256 hash of the refresh token.
    pub refresh_token_hash: String,
    /// Client user agent, if captured.
    pub user_agent: Option<String>,
    /// Client IP, if captured.
    pub ip_address: Option<String>,
    /// Expiry timestamp.
    pub expires_at: DateTimeWithTimeZone,
    /// Revocation timestamp; null while active.
    pub revoked_at: Option<DateTimeWithTimeZone>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The session's user.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
