//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource.

pub mod admin;
pub mod health;
pub mod reservations;
pub mod slots;

use crate::error::AppError;
use slot_booking_core::store::parse_id;

/// Parses an integer path id.
fn path_id(raw: &str) -> Result<i64, AppError> {
    parse_id(raw).ok_or_else(|| AppError::bad_request(format!("Invalid id: {raw}")))
}
