//! Error type for HTTP handlers.
//!
//! `AppError` carries everything needed to answer a failed request: status,
//! client-facing message, a machine-readable code, per-field validation
//! failures when there are any, and an internal source that is logged but
//! never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventhub_core::{EntityKind, StoreError, ValidationErrors};
use serde::Serialize;
use std::fmt;

/// Message sent with every validation failure; the details go in `Errors`.
pub const VALIDATION_MESSAGE: &str = "One or more validation errors occurred.";

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(
///     State(state): State<AppState>,
///     path: IdPath<Category>,
/// ) -> WebResult<Json<Category>> {
///     let found = state.db().categories().find(path.id()).await?;
///     let category = found.ok_or_else(|| AppError::not_found(EntityKind::Category))?;
///     Ok(Json(category.record))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Field-level failures, for validation errors
    errors: Option<ValidationErrors>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            errors: None,
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// 404 Not Found with the resource's own message.
    #[must_use]
    pub fn not_found(kind: EntityKind) -> Self {
        Self::new(StatusCode::NOT_FOUND, kind.not_found_message(), "NOT_FOUND")
    }

    /// A uniqueness violation. Answers 400 with code `CONFLICT`.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "CONFLICT")
    }

    /// 400 with per-field failures.
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new(StatusCode::BAD_REQUEST, VALIDATION_MESSAGE, "VALIDATION_ERROR")
        }
    }

    /// 415 Unsupported Media Type.
    #[must_use]
    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message,
            "UNSUPPORTED_MEDIA_TYPE",
        )
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// 503 Service Unavailable.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message,
            "SERVICE_UNAVAILABLE",
        )
    }

    /// HTTP status this error answers with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            message: self.message,
            code: self.code,
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(INTERNAL_MESSAGE).with_source(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(INTERNAL_MESSAGE).with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found_uses_resource_message() {
        let err = AppError::not_found(EntityKind::Category);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Categoria não encontrada.");
    }

    #[test]
    fn test_conflict_is_bad_request() {
        let err = AppError::conflict("Categoria com este nome já existe.");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_store_error_is_internal() {
        let err = AppError::from(StoreError::Poisoned(EntityKind::Event));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_body_has_message_and_code() {
        let (status, body) = body_json(AppError::not_found(EntityKind::User)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            serde_json::json!({ "Message": "Usuário não encontrado.", "Code": "NOT_FOUND" })
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("Nome", "O nome da categoria é obrigatório.");

        let (status, body) = body_json(AppError::validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["Message"], VALIDATION_MESSAGE);
        assert_eq!(
            body["Errors"],
            serde_json::json!({ "Nome": ["O nome da categoria é obrigatório."] })
        );
    }

    #[tokio::test]
    async fn test_internal_source_is_not_exposed() {
        let err = AppError::from(anyhow::anyhow!("lock poisoned at table.rs"));
        let (_, body) = body_json(err).await;
        assert_eq!(body["Message"], INTERNAL_MESSAGE);
        assert!(!body.to_string().contains("table.rs"));
    }
}
