//! Branch routes, scoped by the access resolver.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser, middleware::load_actor};
use sekolah_db::BranchRepository;
use sekolah_shared::PageRequest;

/// Creates the branches router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches))
        .route("/branches/{branch_id}", get(get_branch))
}

/// GET /branches - List branches visible to the caller's scope.
async fn list_branches(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Response {
    let actor = match load_actor(&state, &auth).await {
        Ok(actor) => actor,
        Err(e) => {
            error!(error = %e, "Failed to build actor");
            return internal_error();
        }
    };

    let branch_repo = BranchRepository::new((*state.db).clone());
    let scope = match branch_repo.resolve_scope(Some(&actor)).await {
        Ok(scope) => scope,
        Err(e) => {
            error!(error = %e, "Failed to resolve scope");
            return internal_error();
        }
    };

    match branch_repo.list_in_scope(&scope, &page).await {
        Ok(branches) => Json(json!(branches)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list branches");
            internal_error()
        }
    }
}

/// GET `/branches/{branch_id}` - Get one branch.
///
/// A branch outside the caller's scope is indistinguishable from a missing
/// one: both answer 404.
async fn get_branch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(branch_id): Path<uuid::Uuid>,
) -> Response {
    let actor = match load_actor(&state, &auth).await {
        Ok(actor) => actor,
        Err(e) => {
            error!(error = %e, "Failed to build actor");
            return internal_error();
        }
    };

    let branch_repo = BranchRepository::new((*state.db).clone());
    let scope = match branch_repo.resolve_scope(Some(&actor)).await {
        Ok(scope) => scope,
        Err(e) => {
            error!(error = %e, "Failed to resolve scope");
            return internal_error();
        }
    };

    match branch_repo.find_in_scope(branch_id, &scope).await {
        Ok(Some(branch)) => Json(json!(branch)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Branch not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load branch");
            internal_error()
        }
    }
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
