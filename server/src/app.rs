//! Application assembly: Sheets client, booking service, router.

use crate::config::Config;
use anyhow::Context;
use axum::Router;
use slot_booking_core::environment::SystemClock;
use slot_booking_core::gate::{AdminLogin, PrefixTokenGate};
use slot_booking_core::service::{BookingService, Tables};
use slot_booking_sheets::{Credentials, SheetsClient};
use slot_booking_web::{AppState, build_router};
use std::sync::Arc;

/// Builds the Sheets-backed service, writes missing header rows and returns
/// the HTTP router.
///
/// # Errors
///
/// Fails if the Sheets client cannot be built or the header rows cannot be
/// read or written.
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let sheets = &config.sheets;
    let mut client = SheetsClient::new(
        sheets.spreadsheet_id.clone(),
        Credentials::detect(sheets.credential.clone()),
        sheets.timeout(),
    )
    .context("building Sheets client")?;
    if let Some(api_url) = &sheets.api_url {
        client = client
            .with_api_url(api_url)
            .context("parsing SHEETS_API_URL")?;
    }

    let clock = Arc::new(SystemClock);
    let booking = BookingService::new(
        Arc::new(client),
        clock.clone(),
        Tables::named(sheets.slots_sheet.clone(), sheets.reservations_sheet.clone()),
    );
    booking
        .bootstrap()
        .await
        .context("writing sheet headers")?;
    tracing::info!(
        spreadsheet = %sheets.spreadsheet_id,
        slots = %sheets.slots_sheet,
        reservations = %sheets.reservations_sheet,
        "Sheets ready"
    );

    if config.admin.password.is_empty() {
        tracing::warn!("ADMIN_PASSWORD is not set; admin login is disabled");
    }
    let login = AdminLogin::new(config.admin.password.clone(), clock);

    let state = AppState::new(booking, Arc::new(PrefixTokenGate::default()), login);
    Ok(build_router(state))
}
