//! # Slot Booking Core
//!
//! Capacity-checked reservations of scarce slots, stored in a remote
//! spreadsheet that offers no transactions and no uniqueness constraints.
//!
//! ## Components
//!
//! - **Row store** ([`store::RowStore`]): the only way anything reaches storage
//! - **Slot Registry** ([`registry::SlotRegistry`]): slots and their seat counts
//! - **Reservation Ledger** ([`ledger::ReservationLedger`]): one row per reservation
//! - **Reservation Engine** ([`engine::ReservationEngine`]): accept/reject policy
//! - **Slot Catalog** ([`catalog::SlotCatalog`]): availability view, slot admin
//! - **Reservation Roster** ([`roster::ReservationRoster`]): reservation admin
//! - **Admin Gate** ([`gate::AdminGate`]): admin token check and login
//!
//! [`service::BookingService`] wires them together over one store.
//!
//! ## Example
//!
//! ```ignore
//! use slot_booking_core::prelude::*;
//! use std::sync::Arc;
//!
//! let service = BookingService::new(store, Arc::new(SystemClock), Tables::default());
//! service.bootstrap().await?;
//!
//! let slot = service.catalog().create_slot("Acme Corp", 1).await?;
//! let submitted = service.engine().submit(&candidate).await?;
//! ```

pub mod catalog;
pub mod engine;
pub mod environment;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod locks;
pub mod metrics;
pub mod positional;
pub mod registry;
pub mod roster;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

/// Common imports.
pub mod prelude {
    pub use crate::catalog::SlotCatalog;
    pub use crate::engine::ReservationEngine;
    pub use crate::environment::{Clock, MonotonicIds, SystemClock};
    pub use crate::error::BookingError;
    pub use crate::gate::{AdminGate, AdminLogin, PrefixTokenGate};
    pub use crate::roster::ReservationRoster;
    pub use crate::service::{BookingService, Tables};
    pub use crate::store::{Range, Row, RowStore, SheetId, StoreError, StoreFuture, Table};
    pub use crate::types::{
        MakeupHours, Reservation, ReservationCandidate, ReservationId, Slot, SlotId, SlotView,
        Submitted,
    };
}
