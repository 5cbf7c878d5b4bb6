//! Custom Axum extractors.
//!
//! - `JsonBody`: JSON request body whose rejections answer with an [`AppError`]
//! - `IdPath`: the `:id` path segment as a [`RecordId`] of one resource
//! - `CorrelationId`: the request's correlation ID
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     correlation_id: CorrelationId,
//!     path: IdPath<Category>,
//!     JsonBody(category): JsonBody<Category>,
//! ) -> WebResult<StatusCode> {
//!     tracing::info!(correlation_id = %correlation_id.0, id = %path.id(), "Updating category");
//!     Ok(StatusCode::NO_CONTENT)
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use eventhub_core::{Entity, ParseRecordIdError, RecordId};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use uuid::Uuid;

/// JSON request body.
///
/// Same decoding as [`axum::Json`], but a body that is not JSON, does not
/// parse, or has a wrongly-typed field answers 400 with the decoder's
/// message in the usual error body. A missing `Content-Type` answers 415.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(rejection)) => {
                Err(AppError::unsupported_media_type(rejection.body_text()))
            }
            Err(rejection) => Err(AppError::bad_request(rejection.body_text())),
        }
    }
}

/// Record identifier taken from the `:id` path segment of resource `T`.
///
/// Text that is not an integer answers 400. An integer no record can carry,
/// negative or past the id space, answers 404 with `T`'s not-found message.
#[derive(Debug)]
pub struct IdPath<T> {
    id: RecordId,
    resource: PhantomData<fn() -> T>,
}

impl<T> IdPath<T> {
    /// The parsed identifier.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: Entity,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        match raw.parse::<RecordId>() {
            Ok(id) => Ok(Self {
                id,
                resource: PhantomData,
            }),
            Err(ParseRecordIdError::OutOfRange(_)) => Err(AppError::not_found(T::KIND)),
            Err(err @ ParseRecordIdError::Malformed(_)) => {
                Err(AppError::bad_request(err.to_string()))
            }
        }
    }
}

/// Correlation ID for request tracing.
///
/// Taken from the request extensions when the tracking middleware ran,
/// otherwise parsed from the `X-Correlation-ID` header, otherwise a new
/// UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Read the correlation ID a client sent, if it is a valid UUID.
    #[must_use]
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Option<Self> {
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<Self>()
            .copied()
            .or_else(|| Self::from_headers(&parts.headers))
            .unwrap_or_else(|| Self(Uuid::new_v4()));

        Ok(correlation_id)
    }
}
