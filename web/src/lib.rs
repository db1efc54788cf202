//! HTTP surface for slot booking.
//!
//! Thin Axum shell over [`slot_booking_core::service::BookingService`]:
//! handlers decode the request, call one booking operation and map the
//! outcome to an HTTP response.
//!
//! # Request Flow
//!
//! 1. **Correlation id** is attached by [`middleware::correlation_id_layer`]
//! 2. **Extractors** decode JSON and resolve admin rights
//! 3. **Handler** calls the booking service
//! 4. **Result** becomes an [`ApiResponse`] or an [`AppError`]
//!
//! Every response body carries `success`; failures add a stable `code`.
//!
//! # Example
//!
//! ```ignore
//! use slot_booking_web::{AppState, build_router};
//!
//! let state = AppState::new(booking, gate, login);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, build_router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::AppError;
pub use extractors::{AdminCredential, CorrelationId, IsAdmin, RequireAdmin};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer, describe_http_metrics};
pub use response::ApiResponse;
pub use router::build_router;
pub use state::AppState;
