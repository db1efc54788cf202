//! Reservation administration.

use crate::error::BookingError;
use crate::ledger::ReservationLedger;
use crate::metrics;
use crate::types::{Reservation, ReservationId};

/// Lists and deletes reservations on behalf of an admin.
#[derive(Debug, Clone)]
pub struct ReservationRoster {
    ledger: ReservationLedger,
}

impl ReservationRoster {
    /// Creates a roster.
    #[must_use]
    pub const fn new(ledger: ReservationLedger) -> Self {
        Self { ledger }
    }

    /// Every stored reservation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StoreIo`] if the ledger cannot be read.
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, BookingError> {
        self.ledger
            .reservations()
            .await
            .map_err(BookingError::StoreIo)
    }

    /// Deletes the first reservation stored under `id`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if no reservation has that id
    /// - [`BookingError::StoreMetadata`] if the sheet identifier cannot be resolved
    /// - [`BookingError::StoreIo`] if the read or delete fails
    pub async fn delete_reservation(&self, id: ReservationId) -> Result<(), BookingError> {
        if !self.ledger.delete(id).await? {
            return Err(BookingError::NotFound {
                resource: "Reservation",
                id: id.0,
            });
        }
        metrics::record_reservation_deleted();
        tracing::info!(reservation_id = %id, "Reservation deleted");
        Ok(())
    }
}
