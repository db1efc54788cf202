//! # Slot Booking Testing
//!
//! Test support for the slot booking crates.
//!
//! This crate provides:
//! - [`InMemoryRowStore`]: the row store capability backed by a `HashMap`,
//!   with failure injection and artificial latency
//! - [`FixedClock`] and [`test_clock`]: deterministic time
//! - [`fixtures`]: builders for candidates and seeded tables
//! - [`properties`]: proptest strategies for submissions
//!
//! ## Example
//!
//! ```ignore
//! use slot_booking_testing::{fixtures, test_clock, InMemoryRowStore};
//!
//! #[tokio::test]
//! async fn test_last_seat() {
//!     let store = fixtures::seeded_store(&[(1, "Acme Corp", 1)]);
//!     let service = fixtures::service(&store, test_clock());
//!
//!     let ok = service.engine().submit(&fixtures::candidate("a@x.com", 1).build()).await;
//!     assert!(ok.is_ok());
//! }
//! ```

pub mod fixtures;
pub mod properties;
pub mod row_store;

use chrono::{DateTime, Utc};
use slot_booking_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time. Ids minted against it still differ,
    /// because the id generator never repeats itself.
    ///
    /// # Example
    ///
    /// ```
    /// use slot_booking_testing::mocks::FixedClock;
    /// use slot_booking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A fixed clock at 2025-03-01 09:00:00 UTC.
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is a constant.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Installs a test-friendly `tracing` subscriber once per process.
///
/// Respects `RUST_LOG`; output goes through the test harness capture.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use row_store::{InMemoryRowStore, Operation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-03-01T09:00:00+00:00");
    }
}
