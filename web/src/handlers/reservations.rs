//! Reservation routes.
//!
//! ```text
//! POST   /api/reservations              submit (public)
//! GET    /api/reservations              list (admin)
//! DELETE /api/reservations/:id          delete (admin)
//! ```

use super::path_id;
use super::slots::Deleted;
use crate::error::AppError;
use crate::extractors::{CorrelationId, RequireAdmin};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;
use slot_booking_core::types::{Reservation, ReservationCandidate, ReservationId};

/// Body of a successful submission.
#[derive(Debug, Serialize)]
pub struct ReservationCreated {
    /// New reservation id
    pub id: ReservationId,
    /// Confirmation text
    pub message: &'static str,
}

/// Submit a reservation.
///
/// # Errors
///
/// - 400 for validation failures, a duplicate email or a full slot
/// - 404 for an unknown slot
/// - 500 if the reservation cannot be stored
pub async fn submit_reservation(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    body: Result<Json<ReservationCandidate>, JsonRejection>,
) -> Result<ApiResponse<ReservationCreated>, AppError> {
    let Json(candidate) = body?;
    tracing::debug!(correlation_id = %correlation_id.0, "Submitting reservation");

    let submitted = state.booking.engine().submit(&candidate).await?;
    Ok(ApiResponse::ok(ReservationCreated {
        id: submitted.id,
        message: "Reservation created",
    }))
}

/// List every reservation.
///
/// # Errors
///
/// - 401 without an accepted admin token
/// - 500 if the ledger cannot be read
pub async fn list_reservations(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<ApiResponse<Vec<Reservation>>, AppError> {
    let reservations = state.booking.roster().list_reservations().await?;
    Ok(ApiResponse::ok(reservations))
}

/// Delete a reservation.
///
/// # Errors
///
/// - 401 without an accepted admin token
/// - 404 if no reservation has the id
/// - 500 on store failure
pub async fn delete_reservation(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<ApiResponse<Deleted>, AppError> {
    let id = path_id(&id)?;
    state
        .booking
        .roster()
        .delete_reservation(ReservationId(id))
        .await?;
    Ok(ApiResponse::ok(Deleted { id }).with_message("Reservation deleted"))
}
