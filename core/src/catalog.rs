//! Slot availability view and slot administration.

use crate::environment::{Clock, MonotonicIds};
use crate::error::BookingError;
use crate::ledger::ReservationLedger;
use crate::metrics;
use crate::registry::SlotRegistry;
use crate::types::{Slot, SlotId, SlotView};
use std::sync::Arc;

/// Lists, creates and deletes slots.
///
/// Callers are expected to have checked admin rights before calling
/// [`create_slot`](Self::create_slot) or [`delete_slot`](Self::delete_slot).
pub struct SlotCatalog {
    registry: SlotRegistry,
    ledger: ReservationLedger,
    clock: Arc<dyn Clock>,
    ids: Arc<MonotonicIds>,
}

impl SlotCatalog {
    /// Creates a catalog.
    #[must_use]
    pub fn new(
        registry: SlotRegistry,
        ledger: ReservationLedger,
        clock: Arc<dyn Clock>,
        ids: Arc<MonotonicIds>,
    ) -> Self {
        Self {
            registry,
            ledger,
            clock,
            ids,
        }
    }

    /// Lists slots.
    ///
    /// Admins see every listable slot. Students see only slots with a free
    /// seat, annotated with `seats_remaining`; if occupancy cannot be read
    /// they see every slot without the annotation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StoreIo`] if the slots table cannot be read.
    pub async fn list_slots(&self, for_admin: bool) -> Result<Vec<SlotView>, BookingError> {
        let slots = self.registry.slots().await.map_err(BookingError::StoreIo)?;
        if for_admin {
            return Ok(slots.into_iter().map(SlotView::from).collect());
        }

        let occupancy = match self.ledger.occupancy().await {
            Ok(occupancy) => occupancy,
            Err(error) => {
                tracing::warn!(%error, "Occupancy unavailable, listing every slot");
                metrics::record_store_fallback("listing");
                return Ok(slots.into_iter().map(SlotView::from).collect());
            }
        };

        Ok(slots
            .into_iter()
            .filter_map(|slot| {
                let taken = occupancy.get(&slot.id).copied().unwrap_or(0);
                let remaining = slot.total_seats.saturating_sub(taken);
                (remaining > 0).then(|| SlotView {
                    seats_remaining: Some(remaining),
                    ..SlotView::from(slot)
                })
            })
            .collect())
    }

    /// Creates a slot with a fresh id.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidInput`] if the name is blank or the seat count is not positive
    /// - [`BookingError::StoreIo`] if the append fails
    pub async fn create_slot(&self, name: &str, total_seats: i64) -> Result<Slot, BookingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BookingError::InvalidInput("name is required".to_string()));
        }
        let total_seats = u32::try_from(total_seats)
            .ok()
            .filter(|seats| *seats >= 1)
            .ok_or_else(|| {
                BookingError::InvalidInput("totalSeats must be at least 1".to_string())
            })?;

        let slot = Slot {
            id: SlotId(self.ids.next(self.clock.now())),
            name: name.to_string(),
            total_seats,
        };
        self.registry
            .append(&slot)
            .await
            .map_err(BookingError::StoreIo)?;

        metrics::record_slot_created();
        tracing::info!(slot_id = %slot.id, name = %slot.name, total_seats, "Slot created");
        Ok(slot)
    }

    /// Deletes the first slot stored under `id`.
    ///
    /// Reservations that reference the slot are left in place.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if no slot has that id
    /// - [`BookingError::StoreMetadata`] if the sheet identifier cannot be resolved
    /// - [`BookingError::StoreIo`] if the read or delete fails
    pub async fn delete_slot(&self, id: SlotId) -> Result<(), BookingError> {
        if !self.registry.delete(id).await? {
            return Err(BookingError::NotFound {
                resource: "Slot",
                id: id.0,
            });
        }
        metrics::record_slot_deleted();
        tracing::info!(slot_id = %id, "Slot deleted");
        Ok(())
    }
}

impl std::fmt::Debug for SlotCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotCatalog")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
