//! Slot booking HTTP server.
//!
//! # Usage
//!
//! ```bash
//! GOOGLE_SPREADSHEET_ID=... GOOGLE_ACCESS_TOKEN=... ADMIN_PASSWORD=... \
//!     cargo run -p slot-booking-server
//! ```

use anyhow::Context;
use slot_booking_server::{Config, build_app, telemetry};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();
    info!("Starting Slot Booking Server");

    let config = Config::from_env().context("loading configuration")?;
    info!(
        spreadsheet = %config.sheets.spreadsheet_id,
        address = %config.server.address(),
        "Configuration loaded"
    );

    telemetry::install_metrics(&config.server.metrics_address())?;

    let app = build_app(&config).await?;

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(address = %addr, "Server listening");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined.context("server task panicked")??;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    let grace = config.server.shutdown_grace();
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined.context("server task panicked")??,
        Err(_) => warn!(?grace, "Graceful shutdown timed out, dropping open connections"),
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
