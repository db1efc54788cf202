//! Slot Registry: the `Slots` table.

use crate::error::BookingError;
use crate::positional::delete_first_matching;
use crate::store::{RowStore, StoreError, Table, cell, parse_id};
use crate::types::{Slot, SlotId};
use std::sync::Arc;

/// Typed access to the slots table.
#[derive(Clone)]
pub struct SlotRegistry {
    store: Arc<dyn RowStore>,
    table: Table,
}

impl SlotRegistry {
    /// Creates a registry over `table`.
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, table: Table) -> Self {
        Self { store, table }
    }

    /// The backing table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Every listable slot (positive id, non-empty name), in storage order.
    ///
    /// # Errors
    ///
    /// Returns the store error if the read fails.
    pub async fn slots(&self) -> Result<Vec<Slot>, StoreError> {
        let rows = self.store.read_range(self.table.full_range()).await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter_map(|row| Slot::from_row(row))
            .filter(Slot::is_listable)
            .collect())
    }

    /// The first slot stored under `id`, listable or not.
    ///
    /// # Errors
    ///
    /// Returns the store error if the read fails.
    pub async fn find(&self, id: SlotId) -> Result<Option<Slot>, StoreError> {
        let rows = self.store.read_range(self.table.full_range()).await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter_map(|row| Slot::from_row(row))
            .find(|slot| slot.id == id))
    }

    /// Appends one slot row.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write fails.
    pub async fn append(&self, slot: &Slot) -> Result<(), StoreError> {
        self.store
            .append_rows(self.table.full_range(), vec![slot.to_row()])
            .await
    }

    /// Removes the first row whose id equals `id`. Returns `false` if none did.
    ///
    /// # Errors
    ///
    /// See [`delete_first_matching`].
    pub async fn delete(&self, id: SlotId) -> Result<bool, BookingError> {
        delete_first_matching(self.store.as_ref(), &self.table, |row| {
            parse_id(cell(row, 0)) == Some(id.0)
        })
        .await
    }
}

impl std::fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRegistry")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
