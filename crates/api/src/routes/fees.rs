//! Fee ledger routes: student dues, payment allocation, and waivers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use sekolah_core::fees::{AllocationRequest, DueStatus};
use sekolah_db::repositories::{DueFilter, FeeRepository, FeeRepositoryError};

/// Creates the fees router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students/{student_id}/dues", get(student_dues))
        .route("/payments/{payment_id}/allocations", post(allocate_payment))
        .route("/dues/{due_id}/waive", post(waive_due))
}

/// Translates a fee repository error into its API response.
fn fee_error_response(err: &FeeRepositoryError) -> Response {
    if let FeeRepositoryError::Database(e) = err {
        error!(error = %e, "Database error in fee operation");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
            "retryable": err.is_retryable(),
        })),
    )
        .into_response()
}

/// Query parameters for the dues listing.
#[derive(Debug, Deserialize)]
struct DuesQuery {
    academic_year: Option<String>,
    fee_type: Option<String>,
    status: Option<DueStatus>,
}

/// GET `/students/{student_id}/dues` - Dues grouped by fee type with totals.
async fn student_dues(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(student_id): Path<uuid::Uuid>,
    Query(query): Query<DuesQuery>,
) -> Response {
    let repo = FeeRepository::new((*state.db).clone());
    let filter = DueFilter {
        academic_year: query.academic_year,
        fee_type: query.fee_type,
        status: query.status,
    };

    match repo.student_dues(student_id, &filter).await {
        Ok(result) => Json(json!({
            "student_id": student_id,
            "dues": result.dues,
            "summary": result.summary,
        }))
        .into_response(),
        Err(e) => fee_error_response(&e),
    }
}

/// Allocation request payload.
#[derive(Debug, Deserialize)]
struct AllocatePaymentRequest {
    allocations: Vec<AllocationRequest>,
}

/// POST `/payments/{payment_id}/allocations` - Distribute a payment across dues.
///
/// All-or-nothing: any invariant violation or write conflict leaves every
/// due untouched. A 409 response is retryable as a whole batch.
async fn allocate_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<uuid::Uuid>,
    Json(payload): Json<AllocatePaymentRequest>,
) -> Response {
    let repo = FeeRepository::new((*state.db).clone());

    match repo
        .apply_payment_to_dues(payment_id, &payload.allocations)
        .await
    {
        Ok(plan) => {
            info!(
                payment_id = %payment_id,
                actor_id = %auth.user_id(),
                total = %plan.total_allocated,
                dues = plan.updates.len(),
                "Payment allocated"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "payment_id": plan.payment_id,
                    "total_allocated": plan.total_allocated,
                    "updates": plan
                        .updates
                        .iter()
                        .map(|u| json!({
                            "due_id": u.due_id,
                            "amount": u.amount,
                            "balance_amount": u.new_balance,
                            "status": u.new_status,
                        }))
                        .collect::<Vec<_>>(),
                })),
            )
                .into_response()
        }
        Err(e) => fee_error_response(&e),
    }
}

/// Waiver request payload.
#[derive(Debug, Deserialize)]
struct WaiveRequest {
    reason: String,
}

/// POST `/dues/{due_id}/waive` - Cancel a due's remaining balance.
async fn waive_due(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(due_id): Path<uuid::Uuid>,
    Json(payload): Json<WaiveRequest>,
) -> Response {
    if payload.reason.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_reason",
                "message": "A waiver reason is required"
            })),
        )
            .into_response();
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .waive_due(due_id, payload.reason.trim(), auth.user_id())
        .await
    {
        Ok(due) => {
            info!(due_id = %due_id, actor_id = %auth.user_id(), "Due waived");
            Json(json!(due)).into_response()
        }
        Err(e) => fee_error_response(&e),
    }
}
