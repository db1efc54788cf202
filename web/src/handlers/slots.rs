//! Slot routes.
//!
//! ```text
//! GET    /api/slots[?adminToken=...]   list (admins see every slot)
//! POST   /api/slots                    create (admin)
//! DELETE /api/slots/:id                delete (admin)
//! ```

use super::path_id;
use crate::error::AppError;
use crate::extractors::{AdminCredential, IsAdmin, RequireAdmin};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slot_booking_core::types::{Slot, SlotId, SlotView};

/// Body of `POST /api/slots`.
///
/// `nome` and `postiTotali` are accepted as aliases for older forms. The
/// admin token may travel in the body when the client cannot set headers;
/// any presented token passing the gate is enough.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    /// Display label
    #[serde(default, alias = "nome")]
    pub name: String,
    /// Seat count, as a number or numeric string
    #[serde(default, alias = "postiTotali")]
    pub total_seats: Value,
    /// Admin token
    #[serde(default)]
    pub admin_token: Option<String>,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    /// Id of the removed record
    pub id: i64,
}

/// List slots.
///
/// # Errors
///
/// Returns 500 if the slots table cannot be read.
pub async fn list_slots(
    State(state): State<AppState>,
    IsAdmin(is_admin): IsAdmin,
) -> Result<ApiResponse<Vec<SlotView>>, AppError> {
    let slots = state.booking.catalog().list_slots(is_admin).await?;
    Ok(ApiResponse::ok(slots))
}

/// Create a slot.
///
/// # Errors
///
/// - 401 without an accepted admin token
/// - 400 for a blank name or a seat count below one
/// - 500 if the append fails
pub async fn create_slot(
    State(state): State<AppState>,
    AdminCredential(mut tokens): AdminCredential,
    body: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> Result<ApiResponse<Slot>, AppError> {
    let Json(request) = body?;

    tokens.extend(request.admin_token);
    if !AdminCredential(tokens).is_admin(&state) {
        return Err(AppError::unauthorized());
    }

    let total_seats = seat_count(&request.total_seats)
        .ok_or_else(|| AppError::bad_request("totalSeats must be an integer"))?;
    let slot = state
        .booking
        .catalog()
        .create_slot(&request.name, total_seats)
        .await?;
    Ok(ApiResponse::ok(slot).with_message("Slot created"))
}

/// Delete a slot.
///
/// # Errors
///
/// - 401 without an accepted admin token
/// - 404 if no slot has the id
/// - 500 on store failure
pub async fn delete_slot(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<ApiResponse<Deleted>, AppError> {
    let id = path_id(&id)?;
    state.booking.catalog().delete_slot(SlotId(id)).await?;
    Ok(ApiResponse::ok(Deleted { id }).with_message("Slot deleted"))
}

fn seat_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
