//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// The claims carry the user's role and home branch so the access resolver
/// can be built without an extra user lookup on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role slug (e.g. `super_admin`, `branch_admin`).
    pub role: String,
    /// Home branch ID, absent for super admins.
    pub branch: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        role: &str,
        branch_id: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            branch: branch_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the home branch ID from claims.
    #[must_use]
    pub const fn branch_id(&self) -> Option<Uuid> {
        self.branch
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// Role slug.
    pub role: String,
    /// Home branch, if any.
    pub branch_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_carry_branch() {
        let user = Uuid::new_v4();
        let branch = Uuid::new_v4();
        let claims = Claims::new(
            user,
            "branch_admin",
            Some(branch),
            Utc::now() + chrono::Duration::minutes(15),
        );

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.branch_id(), Some(branch));
        assert_eq!(claims.role, "branch_admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_without_branch() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "super_admin",
            None,
            Utc::now() + chrono::Duration::minutes(15),
        );
        assert_eq!(claims.branch_id(), None);
    }
}
