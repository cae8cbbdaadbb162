//! Session repository for refresh-token sessions.
//!
//! Refresh tokens are never stored raw: only their SHA-256 hash lands in
//! the table, and validation re-hashes the presented token.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Session repository for refresh-token lifecycle.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new session for a freshly issued refresh token.
    pub async fn create(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        expires_at: chrono::DateTime<Utc>,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Result<sessions::Model, DbErr> {
        sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            refresh_token_hash: Set(hash_token(refresh_token)),
            user_agent: Set(user_agent),
            ip_address: Set(ip_address),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Finds the live (unexpired, unrevoked) session for a refresh token.
    pub async fn find_live(&self, refresh_token: &str) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Revokes a session.
    pub async fn revoke(&self, session_id: Uuid) -> Result<(), DbErr> {
        let session = sessions::Entity::find_by_id(session_id).one(&self.db).await?;
        if let Some(session) = session {
            let mut active: sessions::ActiveModel = session.into();
            active.revoked_at = Set(Some(Utc::now().into()));
            active.update(&self.db).await?;
        }
        Ok(())
    }
}

/// Hex-encoded SHA-256 of a token.
fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_and_hex() {
        let hash = hash_token("some-refresh-token");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("some-refresh-token"));
        assert_ne!(hash, hash_token("another-token"));
    }
}
