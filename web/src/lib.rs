//! Axum HTTP boundary for the eventhub API.
//!
//! Turns requests into calls on the persistence gateway and gateway outcomes
//! into status codes and JSON bodies.
//!
//! # Request Flow
//!
//! 1. **Track** the request (correlation ID, span, metrics)
//! 2. **Extract** path id and JSON body
//! 3. **Validate** the body
//! 4. **Query or commit** through the `Database`
//! 5. **Map** the outcome to a response or an [`AppError`]
//!
//! # Example
//!
//! ```ignore
//! use eventhub_memory::InMemoryDatabase;
//! use eventhub_web::{build_router, AppState};
//! use std::sync::Arc;
//!
//! let app = build_router(AppState::new(Arc::new(InMemoryDatabase::new())));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{CorrelationId, IdPath, JsonBody};
pub use middleware::{request_tracking_layer, CORRELATION_ID_HEADER};
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
