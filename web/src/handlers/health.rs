//! Health check endpoint.

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

/// Liveness probe.
///
/// Does not touch the spreadsheet; a store outage shows up on the booking
/// routes, not here.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
