//! Fee reporting routes: overdue aging and the composed dues report.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser, middleware::load_actor};
use sekolah_core::access::AccessScope;
use sekolah_db::repositories::ReportFilter;
use sekolah_db::{BranchRepository, FeeRepository};

/// Creates the reports router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/overdue", get(overdue_report))
        .route("/reports/dues", get(dues_report))
}

/// Query parameters shared by the report endpoints.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    academic_year: Option<String>,
    fee_type: Option<String>,
}

async fn resolve_report_scope(
    state: &AppState,
    auth: &AuthUser,
) -> Result<AccessScope, Response> {
    let actor = load_actor(state, auth).await.map_err(|e| {
        error!(error = %e, "Failed to build actor");
        internal_error()
    })?;

    BranchRepository::new((*state.db).clone())
        .resolve_scope(Some(&actor))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to resolve scope");
            internal_error()
        })
}

/// GET /reports/overdue - Aging buckets by fee type.
async fn overdue_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let scope = match resolve_report_scope(&state, &auth).await {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let repo = FeeRepository::new((*state.db).clone());
    let filter = ReportFilter {
        academic_year: query.academic_year,
        fee_type: query.fee_type,
    };

    match repo.overdue_aging(&scope, &filter).await {
        Ok(report) => Json(json!(report)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build overdue report");
            internal_error()
        }
    }
}

/// GET /reports/dues - Total outstanding, per-type summary, and aging.
async fn dues_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReportQuery>,
) -> Response {
    let scope = match resolve_report_scope(&state, &auth).await {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    let repo = FeeRepository::new((*state.db).clone());
    let filter = ReportFilter {
        academic_year: query.academic_year,
        fee_type: query.fee_type,
    };

    match repo.dues_report(&scope, &filter).await {
        Ok(report) => Json(json!(report)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to build dues report");
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
