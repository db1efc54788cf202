//! Property-based testing utilities using proptest.

use proptest::prelude::*;

/// Seat counts for up to four slots, each between one and four seats.
pub fn seat_counts() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=4, 1..=4)
}

/// A sequence of submissions as `(email index, slot index)` pairs.
///
/// Emails come from a small pool so duplicates occur; slot indexes may point
/// one past the last slot to exercise unknown ids.
pub fn submissions(slot_count: usize) -> impl Strategy<Value = Vec<(u8, usize)>> {
    prop::collection::vec((0u8..12, 0..=slot_count), 0..30)
}

/// The email for a pool index.
#[must_use]
pub fn email(index: u8) -> String {
    format!("student{index}@example.com")
}
