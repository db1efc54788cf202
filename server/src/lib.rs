//! Slot booking server.
//!
//! Wires the Google Sheets row store, the booking service and the HTTP
//! router together, and owns process-level concerns: configuration from
//! the environment, tracing, the Prometheus exporter and shutdown.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::build_app;
pub use config::{Config, ConfigError};
