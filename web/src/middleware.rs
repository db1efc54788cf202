//! Axum middleware for request tracking and observability.
//!
//! [`correlation_id_layer`] gives every request a correlation id:
//!
//! 1. **Extract** it from the `X-Correlation-ID` header (or generate a UUID v4)
//! 2. **Store** it in request extensions as [`CorrelationId`]
//! 3. **Run** the handler inside a span carrying it
//! 4. **Echo** it in the response `X-Correlation-ID` header
//! 5. **Count** the request in `slot_booking_http_requests_total{method,status}`

use crate::extractors::CorrelationId;
use axum::{extract::Request, http::HeaderValue, response::Response};
use metrics::{describe_counter, describe_histogram};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Registers the HTTP metric descriptions.
pub fn describe_http_metrics() {
    describe_counter!(
        "slot_booking_http_requests_total",
        "HTTP requests by method and status"
    );
    describe_histogram!(
        "slot_booking_http_request_duration_seconds",
        "HTTP request latency"
    );
}

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        req.extensions_mut().insert(CorrelationId(correlation_id));

        let method = req.method().to_string();
        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %method,
            path = %req.uri().path(),
        );
        let started = Instant::now();

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            let status = response.status().as_u16().to_string();
            metrics::counter!("slot_booking_http_requests_total", "method" => method, "status" => status)
                .increment(1);
            metrics::histogram!("slot_booking_http_request_duration_seconds")
                .record(started.elapsed().as_secs_f64());

            if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}
