//! Booking error taxonomy.
//!
//! Business rejections (`Validation`, `DuplicateEmail`, `SlotNotFound`,
//! `SlotFull`, `NotFound`, `InvalidInput`, `Unauthorized`) are ordinary
//! results. Store failures are split by where they happen: `StoreMetadata`
//! when the sheet identifier for a positional delete cannot be resolved,
//! `StoreIo` for everything else that reaches the caller.

use crate::store::StoreError;
use crate::types::SlotId;
use thiserror::Error;

/// Errors returned by booking operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The candidate is malformed; every violated rule is listed.
    #[error("Invalid reservation: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The email already holds a reservation.
    #[error("This email has already made a reservation")]
    DuplicateEmail,

    /// The slot does not exist or has no capacity.
    #[error("Slot {0} not found")]
    SlotNotFound(SlotId),

    /// The slot has no free seat.
    #[error("Slot {0} has no seats left")]
    SlotFull(SlotId),

    /// Delete target missing.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of record
        resource: &'static str,
        /// Requested id
        id: i64,
    },

    /// Admin input rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller lacks admin rights.
    #[error("Unauthorized")]
    Unauthorized,

    /// The sheet identifier for a positional delete could not be resolved.
    #[error("Store metadata error: {0}")]
    StoreMetadata(StoreError),

    /// A store read or write that the operation depends on failed.
    #[error("Store I/O error: {0}")]
    StoreIo(StoreError),
}

impl BookingError {
    /// Short stable label, used for metrics and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateEmail => "duplicate_email",
            Self::SlotNotFound(_) => "slot_not_found",
            Self::SlotFull(_) => "slot_full",
            Self::NotFound { .. } => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Unauthorized => "unauthorized",
            Self::StoreMetadata(_) => "store_metadata",
            Self::StoreIo(_) => "store_io",
        }
    }

    /// Whether the failure is the store's fault rather than the caller's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::StoreMetadata(_) | Self::StoreIo(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_message() {
        let err = BookingError::Validation(vec!["Email is not valid".into(), "month is required".into()]);
        assert_eq!(
            err.to_string(),
            "Invalid reservation: Email is not valid, month is required"
        );
    }

    #[test]
    fn test_internal_errors() {
        assert!(BookingError::StoreIo(StoreError::Request("timeout".into())).is_internal());
        assert!(!BookingError::SlotFull(SlotId(1)).is_internal());
        assert_eq!(BookingError::DuplicateEmail.kind(), "duplicate_email");
    }
}
