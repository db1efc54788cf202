//! Tracing subscriber and Prometheus exporter setup.
//!
//! Metrics are served on their own listener so that scraping never competes
//! with booking traffic.

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,slot_booking=debug,tower_http=debug";

/// Latency buckets for every `*_duration_seconds` histogram.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The metrics address does not parse
    #[error("Invalid metrics address: {0}")]
    Address(String),
    /// Failed to build or install the exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(#[from] BuildError),
}

/// Installs the global `tracing` subscriber.
///
/// Respects `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Installs the Prometheus recorder and its scrape listener, then registers
/// every metric description.
///
/// Must run inside a Tokio runtime.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the address is invalid or the exporter
/// cannot be installed (for example, a recorder is already set).
pub fn install_metrics(address: &str) -> Result<SocketAddr, TelemetryError> {
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| TelemetryError::Address(address.to_string()))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install()?;

    slot_booking_core::metrics::describe_booking_metrics();
    slot_booking_web::describe_http_metrics();

    tracing::info!(%addr, "Metrics available at http://{addr}/metrics");
    Ok(addr)
}
