//! Injected time and id sources.
//!
//! Ids for slots and reservations are millisecond timestamps. A plain
//! `now()` can hand out the same value twice within one millisecond, so ids
//! go through [`MonotonicIds`], which never returns a value it (or an earlier
//! call) has returned before.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use slot_booking_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let _now = clock.now();
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Strictly increasing millisecond ids.
#[derive(Debug, Default)]
pub struct MonotonicIds {
    last: AtomicI64,
}

impl MonotonicIds {
    /// Creates a generator with no history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Returns `max(now_ms, last + 1)` and records it.
    pub fn next(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_follow_the_clock() {
        let ids = MonotonicIds::new();
        let t = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap_or_default();
        assert_eq!(ids.next(t), 1_700_000_000_000);
    }

    #[test]
    fn test_same_millisecond_yields_distinct_ids() {
        let ids = MonotonicIds::new();
        let t = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap_or_default();
        let a = ids.next(t);
        let b = ids.next(t);
        let c = ids.next(t);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_clock_going_backwards_does_not_reuse_ids() {
        let ids = MonotonicIds::new();
        let later = Utc.timestamp_millis_opt(2_000).single().unwrap_or_default();
        let earlier = Utc.timestamp_millis_opt(1_000).single().unwrap_or_default();
        let a = ids.next(later);
        let b = ids.next(earlier);
        assert_eq!(b, a + 1);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let ids = Arc::new(MonotonicIds::new());
        let now = Utc::now();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..500).map(|_| ids.next(now)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap_or_default() {
                assert!(seen.insert(id), "id {id} handed out twice");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
