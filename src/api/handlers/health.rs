//! Health check endpoint handlers.
//!
//! `/health` only proves the process answers. `/health/ready` also checks the
//! database when one is configured, for load balancers and orchestrators.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::HealthResponse;
use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok("Server is running"))
}

/// Readiness check.
///
/// Ready when no database is configured or the database answers `SELECT 1`.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    responses(
        (status = 200, description = "Ready to serve traffic", body = HealthResponse),
        (status = 503, description = "A dependency is unavailable", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(HealthResponse::ok("Ready")));
    };

    match db::check_connection(pool).await {
        Ok(elapsed) => {
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Database ready");
            (StatusCode::OK, Json(HealthResponse::ok("Ready")))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            let message = match e {
                AppError::ServiceUnavailable { message } => message,
                other => format!("Database unavailable: {}", other),
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unavailable(message)),
            )
        }
    }
}
