//! Reservation Ledger: the `Reservations` table.
//!
//! Append-only apart from admin deletes. Checks read single columns
//! (email, assigned slot) rather than whole rows.

use crate::error::BookingError;
use crate::positional::delete_first_matching;
use crate::store::{RowStore, StoreError, Table, cell, parse_id};
use crate::types::{EMAIL_COLUMN, Reservation, ReservationId, SLOT_COLUMN, SlotId, normalize_email};
use std::collections::HashMap;
use std::sync::Arc;

/// Typed access to the reservations table.
#[derive(Clone)]
pub struct ReservationLedger {
    store: Arc<dyn RowStore>,
    table: Table,
}

impl ReservationLedger {
    /// Creates a ledger over `table`.
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, table: Table) -> Self {
        Self { store, table }
    }

    /// The backing table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Whether any reservation is held under `email` (trimmed, ASCII case ignored).
    ///
    /// # Errors
    ///
    /// Returns the store error if the email column cannot be read.
    pub async fn contains_email(&self, email: &str) -> Result<bool, StoreError> {
        let key = normalize_email(email);
        let rows = self.store.read_range(self.table.column(EMAIL_COLUMN)).await?;
        Ok(rows
            .iter()
            .skip(1)
            .any(|row| normalize_email(cell(row, 0)) == key))
    }

    /// Number of reservations assigned to `slot`.
    ///
    /// # Errors
    ///
    /// Returns the store error if the slot column cannot be read.
    pub async fn count_for_slot(&self, slot: SlotId) -> Result<u32, StoreError> {
        Ok(self.occupancy().await?.get(&slot).copied().unwrap_or(0))
    }

    /// Reservation count per slot, from one read of the slot column.
    ///
    /// # Errors
    ///
    /// Returns the store error if the slot column cannot be read.
    pub async fn occupancy(&self) -> Result<HashMap<SlotId, u32>, StoreError> {
        let rows = self.store.read_range(self.table.column(SLOT_COLUMN)).await?;
        let mut counts: HashMap<SlotId, u32> = HashMap::new();
        for id in rows.iter().skip(1).filter_map(|row| parse_id(cell(row, 0))) {
            *counts.entry(SlotId(id)).or_default() += 1;
        }
        Ok(counts)
    }

    /// Every reservation, in storage order. Rows without a numeric id are skipped.
    ///
    /// # Errors
    ///
    /// Returns the store error if the read fails.
    pub async fn reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let rows = self.store.read_range(self.table.full_range()).await?;
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, row)| {
                let reservation = Reservation::from_row(row);
                if reservation.is_none() && row.iter().any(|c| !c.trim().is_empty()) {
                    tracing::warn!(
                        table = self.table.name(),
                        row = index,
                        id = cell(row, 0),
                        "Skipping reservation row with unparsable id"
                    );
                }
                reservation
            })
            .collect())
    }

    /// Appends one reservation row.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write fails.
    pub async fn append(&self, reservation: &Reservation) -> Result<(), StoreError> {
        self.store
            .append_rows(self.table.full_range(), vec![reservation.to_row()])
            .await
    }

    /// Removes the first row whose id equals `id`. Returns `false` if none did.
    ///
    /// # Errors
    ///
    /// See [`delete_first_matching`].
    pub async fn delete(&self, id: ReservationId) -> Result<bool, BookingError> {
        delete_first_matching(self.store.as_ref(), &self.table, |row| {
            parse_id(cell(row, 0)) == Some(id.0)
        })
        .await
    }
}

impl std::fmt::Debug for ReservationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationLedger")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
