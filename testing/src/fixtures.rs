//! Builders for seeded stores, services and reservation candidates.

use crate::mocks::FixedClock;
use crate::row_store::InMemoryRowStore;
use slot_booking_core::service::{BookingService, Tables};
use slot_booking_core::store::Row;
use slot_booking_core::types::{RESERVATION_HEADER, ReservationCandidate, SLOT_HEADER};
use std::sync::Arc;

/// Default slots table name.
pub const SLOTS: &str = "Slots";

/// Default reservations table name.
pub const RESERVATIONS: &str = "Reservations";

/// A stored slot row.
#[must_use]
pub fn slot_row(id: i64, name: &str, total_seats: u32) -> Row {
    vec![id.to_string(), name.to_string(), total_seats.to_string()]
}

/// A store with both headers written and the given slots `(id, name, seats)`.
#[must_use]
pub fn seeded_store(slots: &[(i64, &str, u32)]) -> InMemoryRowStore {
    let mut slot_rows = vec![header_row(&SLOT_HEADER)];
    slot_rows.extend(
        slots
            .iter()
            .map(|(id, name, seats)| slot_row(*id, name, *seats)),
    );
    InMemoryRowStore::new()
        .with_table(SLOTS, slot_rows)
        .with_table(RESERVATIONS, vec![header_row(&RESERVATION_HEADER)])
}

/// A service over `store` with the default table names.
#[must_use]
pub fn service(store: &InMemoryRowStore, clock: FixedClock) -> BookingService {
    BookingService::new(Arc::new(store.clone()), Arc::new(clock), Tables::default())
}

fn header_row(header: &[&str]) -> Row {
    header.iter().map(ToString::to_string).collect()
}

/// Starts a complete, valid candidate for `email` and `slot_id`.
#[must_use]
pub fn candidate(email: &str, slot_id: i64) -> CandidateBuilder {
    CandidateBuilder {
        candidate: ReservationCandidate {
            email: Some(email.to_string()),
            last_name: Some("Rossi".to_string()),
            first_name: Some("Anna".to_string()),
            course_year: Some("2".to_string()),
            modality: Some("Full-time".to_string()),
            internship_number: Some("1".to_string()),
            month: Some("March".to_string()),
            assigned_slot_id: Some(slot_id.to_string()),
            makeup_hours: Some("No".to_string()),
            makeup_hours_qty: None,
            note: None,
        },
    }
}

/// Fluent builder for [`ReservationCandidate`].
#[derive(Debug, Clone)]
pub struct CandidateBuilder {
    candidate: ReservationCandidate,
}

impl CandidateBuilder {
    /// Requests `qty` makeup hours.
    #[must_use]
    pub fn makeup(mut self, qty: &str) -> Self {
        self.candidate.makeup_hours = Some("Yes".to_string());
        self.candidate.makeup_hours_qty = Some(qty.to_string());
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn note(mut self, note: &str) -> Self {
        self.candidate.note = Some(note.to_string());
        self
    }

    /// Sets both names.
    #[must_use]
    pub fn named(mut self, first: &str, last: &str) -> Self {
        self.candidate.first_name = Some(first.to_string());
        self.candidate.last_name = Some(last.to_string());
        self
    }

    /// Sets the slot id as raw text.
    #[must_use]
    pub fn slot_text(mut self, slot: &str) -> Self {
        self.candidate.assigned_slot_id = Some(slot.to_string());
        self
    }

    /// Finishes the candidate.
    #[must_use]
    pub fn build(self) -> ReservationCandidate {
        self.candidate
    }
}
