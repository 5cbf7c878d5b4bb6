//! Request tracking middleware.
//!
//! For every request the layer:
//!
//! 1. **Resolves** the correlation ID from `X-Correlation-ID` (or generates a UUID)
//! 2. **Stores** it in request extensions, where [`CorrelationId`] finds it
//! 3. **Runs** the request inside an `http_request` span
//! 4. **Records** status and latency as a log line and as metrics
//! 5. **Echoes** the correlation ID in the response header
//!
//! # Metrics
//!
//! - `eventhub_http_requests_total` (counter; `method`, `status`)
//! - `eventhub_http_request_duration_seconds` (histogram; `method`, `status`)
//!
//! # Example
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(request_tracking_layer());
//! ```

use crate::extractors::CorrelationId;
use axum::{extract::Request, http::HeaderValue, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Create the request tracking layer.
#[must_use]
pub const fn request_tracking_layer() -> RequestTrackingLayer {
    RequestTrackingLayer
}

/// Layer for request tracking.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestTrackingLayer;

impl<S> Layer<S> for RequestTrackingLayer {
    type Service = RequestTracking<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracking { inner }
    }
}

/// Middleware service produced by [`RequestTrackingLayer`].
#[derive(Clone, Debug)]
pub struct RequestTracking<S> {
    inner: S,
}

impl<S> Service<Request> for RequestTracking<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = CorrelationId::from_headers(req.headers())
            .unwrap_or_else(|| CorrelationId(Uuid::new_v4()));
        req.extensions_mut().insert(correlation_id);

        let method = req.method().clone();
        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id.0,
            method = %method,
            uri = %req.uri(),
        );

        let started = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = fut.await?;

                let elapsed = started.elapsed();
                let status = response.status();
                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = elapsed.as_secs_f64() * 1000.0,
                    "Request completed"
                );

                let labels = [
                    ("method", method.to_string()),
                    ("status", status.as_u16().to_string()),
                ];
                metrics::counter!("eventhub_http_requests_total", &labels).increment(1);
                metrics::histogram!("eventhub_http_request_duration_seconds", &labels)
                    .record(elapsed.as_secs_f64());

                if let Ok(header_value) = HeaderValue::from_str(&correlation_id.0.to_string()) {
                    response
                        .headers_mut()
                        .insert(CORRELATION_ID_HEADER, header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
