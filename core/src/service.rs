//! Wiring of registry, ledger and operations over one shared store.

use crate::catalog::SlotCatalog;
use crate::engine::ReservationEngine;
use crate::environment::{Clock, MonotonicIds};
use crate::error::BookingError;
use crate::ledger::ReservationLedger;
use crate::registry::SlotRegistry;
use crate::roster::ReservationRoster;
use crate::store::{RowStore, Table};
use crate::types::{RESERVATION_COLUMNS, RESERVATION_HEADER, SLOT_COLUMNS, SLOT_HEADER};
use std::sync::Arc;

/// Names of the two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    /// Slots table (`A:C`)
    pub slots: Table,
    /// Reservations table (`A:M`)
    pub reservations: Table,
}

impl Tables {
    /// Tables with the given sheet titles and the standard column spans.
    #[must_use]
    pub fn named(slots: impl Into<String>, reservations: impl Into<String>) -> Self {
        Self {
            slots: Table::new(slots, SLOT_COLUMNS),
            reservations: Table::new(reservations, RESERVATION_COLUMNS),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::named("Slots", "Reservations")
    }
}

/// Every booking operation, sharing one store, clock and id generator.
pub struct BookingService {
    store: Arc<dyn RowStore>,
    tables: Tables,
    engine: ReservationEngine,
    catalog: SlotCatalog,
    roster: ReservationRoster,
}

impl BookingService {
    /// Builds the service.
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, clock: Arc<dyn Clock>, tables: Tables) -> Self {
        let ids = Arc::new(MonotonicIds::new());
        let registry = SlotRegistry::new(Arc::clone(&store), tables.slots.clone());
        let ledger = ReservationLedger::new(Arc::clone(&store), tables.reservations.clone());

        Self {
            engine: ReservationEngine::new(
                registry.clone(),
                ledger.clone(),
                Arc::clone(&clock),
                Arc::clone(&ids),
            ),
            catalog: SlotCatalog::new(registry, ledger.clone(), clock, ids),
            roster: ReservationRoster::new(ledger),
            store,
            tables,
        }
    }

    /// Reservation submission.
    #[must_use]
    pub const fn engine(&self) -> &ReservationEngine {
        &self.engine
    }

    /// Slot listing and administration.
    #[must_use]
    pub const fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Reservation administration.
    #[must_use]
    pub const fn roster(&self) -> &ReservationRoster {
        &self.roster
    }

    /// The configured tables.
    #[must_use]
    pub const fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Writes the header row of every table whose first row is empty.
    ///
    /// Run once at startup so row 0 is a header before the first append.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StoreIo`] if a header cannot be read or written.
    pub async fn bootstrap(&self) -> Result<(), BookingError> {
        self.ensure_header(&self.tables.slots, &SLOT_HEADER).await?;
        self.ensure_header(&self.tables.reservations, &RESERVATION_HEADER)
            .await
    }

    async fn ensure_header(&self, table: &Table, header: &[&str]) -> Result<(), BookingError> {
        let rows = self
            .store
            .read_range(table.header_range())
            .await
            .map_err(BookingError::StoreIo)?;
        let has_header = rows
            .first()
            .is_some_and(|row| row.iter().any(|cell| !cell.trim().is_empty()));
        if has_header {
            return Ok(());
        }

        self.store
            .overwrite_range(
                table.header_range(),
                vec![header.iter().map(ToString::to_string).collect()],
            )
            .await
            .map_err(BookingError::StoreIo)?;
        tracing::info!(table = table.name(), "Wrote header row");
        Ok(())
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}
