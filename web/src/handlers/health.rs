//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Readiness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    /// Always `ready`; a failed check answers with an error body instead.
    pub status: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check the database.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness check: succeeds when every table can be read.
///
/// # Status Codes
///
/// - 200 OK: `{"status":"ready"}`
/// - 503 Service Unavailable: error body with code `SERVICE_UNAVAILABLE`
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Errors
///
/// 503 when the store cannot be read.
pub async fn readiness_check(State(state): State<AppState>) -> WebResult<Json<Readiness>> {
    state.db().ping().await.map_err(|error| {
        AppError::unavailable("Service unavailable").with_source(error.into())
    })?;
    Ok(Json(Readiness { status: "ready" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
