//! Authentication routes: login and token refresh.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use sekolah_core::auth::verify_password;
use sekolah_db::{SessionRepository, UserRepository};
use sekolah_shared::auth::UserInfo;
use sekolah_shared::{LoginRequest, LoginResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

/// POST /auth/login - Exchange credentials for a token pair.
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_active_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            error!(error = %e, "Password verification failed");
            return internal_error();
        }
    }

    let role: sekolah_core::access::UserRole = user.role.clone().into();
    let access_token =
        match state
            .jwt_service
            .generate_access_token(user.id, role.as_str(), user.branch_id)
        {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Failed to generate access token");
                return internal_error();
            }
        };
    let refresh_token =
        match state
            .jwt_service
            .generate_refresh_token(user.id, role.as_str(), user.branch_id)
        {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Failed to generate refresh token");
                return internal_error();
            }
        };

    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = Utc::now() + Duration::days(state.jwt_service.refresh_token_expires_days());
    if let Err(e) = session_repo
        .create(user.id, &refresh_token, expires_at, None, None)
        .await
    {
        error!(error = %e, "Failed to record session");
        return internal_error();
    }

    info!(user_id = %user.id, "User logged in");

    Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role.as_str().to_string(),
            branch_id: user.branch_id,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
    .into_response()
}

/// Refresh request payload.
#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

/// POST /auth/refresh - Exchange a live refresh token for a new access token.
async fn refresh(State(state): State<AppState>, Json(payload): Json<RefreshRequest>) -> Response {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Refresh with invalid token");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Invalid or expired refresh token"
                })),
            )
                .into_response();
        }
    };

    let session_repo = SessionRepository::new((*state.db).clone());
    match session_repo.find_live(&payload.refresh_token).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "session_revoked",
                    "message": "Session is revoked or expired"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during refresh");
            return internal_error();
        }
    }

    let access_token = match state.jwt_service.generate_access_token(
        claims.user_id(),
        &claims.role,
        claims.branch_id(),
    ) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    Json(json!({
        "access_token": access_token,
        "expires_in": state.jwt_service.access_token_expires_in(),
    }))
    .into_response()
}
