//! Reservation Engine: the accept/reject policy for one submission.
//!
//! # Steps
//!
//! 1. Shape validation (pure). Every violation is reported.
//! 2. Duplicate check on the ledger email column. A failed read **fails open**:
//!    the submission proceeds and a warning is logged.
//! 3. Capacity check against the slot's seat count. Any failed read **fails
//!    closed**: the submission is rejected as [`BookingError::SlotFull`].
//! 4. Commit: one appended ledger row with a fresh id. A failed append is
//!    [`BookingError::StoreIo`]; nothing is retried or compensated.
//!
//! Steps 2 to 4 run while holding the email's lock and then the slot's lock,
//! so within one process two submissions can neither both take a slot's
//! last seat nor both book the same email. Other processes writing to the
//! same store are not covered.

use crate::environment::{Clock, MonotonicIds};
use crate::error::BookingError;
use crate::ledger::ReservationLedger;
use crate::locks::KeyedLocks;
use crate::metrics;
use crate::registry::SlotRegistry;
use crate::store::StoreError;
use crate::types::{ReservationCandidate, ReservationId, SlotId, Submitted};
use crate::validation::validate;
use chrono::SecondsFormat;
use std::sync::Arc;
use std::time::Instant;

/// Accepts or rejects reservation candidates.
pub struct ReservationEngine {
    registry: SlotRegistry,
    ledger: ReservationLedger,
    clock: Arc<dyn Clock>,
    ids: Arc<MonotonicIds>,
    email_locks: KeyedLocks<String>,
    slot_locks: KeyedLocks<SlotId>,
}

impl ReservationEngine {
    /// Creates an engine. `ids` is shared with anything else that mints ids.
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
            email_locks: KeyedLocks::new(),
            slot_locks: KeyedLocks::new(),
        }
    }

    /// Validates, checks and records one reservation.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Validation`] if the candidate is malformed
    /// - [`BookingError::DuplicateEmail`] if the email already holds a reservation
    /// - [`BookingError::SlotNotFound`] if the slot is unknown or has no capacity
    /// - [`BookingError::SlotFull`] if no seat is left or occupancy could not be read
    /// - [`BookingError::StoreIo`] if the ledger append fails
    pub async fn submit(&self, candidate: &ReservationCandidate) -> Result<Submitted, BookingError> {
        let started = Instant::now();
        let result = self.try_submit(candidate).await;
        metrics::record_submission(result.as_ref().map(|_| ()), started.elapsed().as_secs_f64());
        if let Err(error) = &result {
            tracing::debug!(kind = error.kind(), %error, "Reservation rejected");
        }
        result
    }

    async fn try_submit(&self, candidate: &ReservationCandidate) -> Result<Submitted, BookingError> {
        let valid = validate(candidate)?;
        let email_key = valid.email_key();
        let slot_id = valid.assigned_slot_id;

        // Always email first, then slot.
        let _email_guard = self.email_locks.lock(email_key.clone()).await;
        let _slot_guard = self.slot_locks.lock(slot_id).await;

        self.check_duplicate(&email_key).await?;
        self.check_capacity(slot_id).await?;

        let now = self.clock.now();
        let id = ReservationId(self.ids.next(now));
        let reservation =
            valid.into_reservation(id, now.to_rfc3339_opts(SecondsFormat::Millis, true));
        self.ledger
            .append(&reservation)
            .await
            .map_err(BookingError::StoreIo)?;

        tracing::info!(
            reservation_id = %id,
            slot_id = %slot_id,
            makeup_hours = reservation.makeup_hours.as_str(),
            "Reservation accepted"
        );
        Ok(Submitted { id })
    }

    async fn check_duplicate(&self, email_key: &str) -> Result<(), BookingError> {
        match self.ledger.contains_email(email_key).await {
            Ok(true) => Err(BookingError::DuplicateEmail),
            Ok(false) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "Duplicate check unavailable, accepting without it");
                metrics::record_store_fallback("duplicate");
                Ok(())
            }
        }
    }

    async fn check_capacity(&self, slot_id: SlotId) -> Result<(), BookingError> {
        let slot = match self.registry.find(slot_id).await {
            Ok(Some(slot)) if slot.total_seats > 0 => slot,
            Ok(_) => return Err(BookingError::SlotNotFound(slot_id)),
            Err(error) => return Err(capacity_unavailable(slot_id, &error)),
        };

        let taken = self
            .ledger
            .count_for_slot(slot_id)
            .await
            .map_err(|error| capacity_unavailable(slot_id, &error))?;

        if taken >= slot.total_seats {
            return Err(BookingError::SlotFull(slot_id));
        }
        tracing::debug!(%slot_id, taken, total_seats = slot.total_seats, "Seat available");
        Ok(())
    }
}

fn capacity_unavailable(slot_id: SlotId, error: &StoreError) -> BookingError {
    tracing::warn!(%slot_id, %error, "Capacity check unavailable, rejecting as full");
    metrics::record_store_fallback("capacity");
    BookingError::SlotFull(slot_id)
}

impl std::fmt::Debug for ReservationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEngine")
            .field("registry", &self.registry)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
