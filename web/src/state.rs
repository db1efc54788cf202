//! Application state for Axum handlers.

use slot_booking_core::gate::{AdminGate, AdminLogin};
use slot_booking_core::service::BookingService;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booking operations
    pub booking: Arc<BookingService>,
    /// Decides whether a request carries admin rights
    pub gate: Arc<dyn AdminGate>,
    /// Password exchange for admin tokens
    pub login: Arc<AdminLogin>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(booking: BookingService, gate: Arc<dyn AdminGate>, login: AdminLogin) -> Self {
        Self {
            booking: Arc::new(booking),
            gate,
            login: Arc::new(login),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("booking", &self.booking)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone state
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
