//! Booking metrics.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `slot_booking_reservations_total{outcome}` - Submissions by outcome
//!   (`accepted`, `validation`, `duplicate_email`, `slot_not_found`, `slot_full`, `store_io`)
//! - `slot_booking_store_fallbacks_total{check}` - Store reads that failed inside a
//!   check and were answered by the fallback policy (`duplicate`, `capacity`, `listing`)
//! - `slot_booking_slots_total{op}` - Slot administration (`created`, `deleted`)
//! - `slot_booking_reservations_deleted_total` - Reservations removed by an admin
//!
//! ## Histograms
//! - `slot_booking_submit_duration_seconds` - Time spent in one submission

use crate::error::BookingError;
use metrics::{describe_counter, describe_histogram};

/// Registers metric descriptions. Call once at startup, before anything is recorded.
pub fn describe_booking_metrics() {
    describe_counter!(
        "slot_booking_reservations_total",
        "Reservation submissions by outcome"
    );
    describe_counter!(
        "slot_booking_store_fallbacks_total",
        "Store read failures absorbed by a fail-open or fail-closed check"
    );
    describe_counter!(
        "slot_booking_slots_total",
        "Slot administration operations (created, deleted)"
    );
    describe_counter!(
        "slot_booking_reservations_deleted_total",
        "Reservations deleted by an administrator"
    );
    describe_histogram!(
        "slot_booking_submit_duration_seconds",
        "Time taken to validate, check and commit one reservation"
    );

    tracing::info!("Booking metrics registered");
}

/// Records the outcome of one submission.
pub fn record_submission(outcome: Result<(), &BookingError>, duration_secs: f64) {
    let outcome = match outcome {
        Ok(()) => "accepted",
        Err(error) => error.kind(),
    };
    metrics::counter!("slot_booking_reservations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("slot_booking_submit_duration_seconds").record(duration_secs);
    tracing::debug!(outcome, duration_secs, "Recorded submission metric");
}

/// Records a store read failure answered by a fallback.
///
/// # Arguments
///
/// * `check` - Which check fell back (`duplicate`, `capacity`, `listing`)
pub fn record_store_fallback(check: &'static str) {
    metrics::counter!("slot_booking_store_fallbacks_total", "check" => check).increment(1);
}

/// Records a slot created.
pub fn record_slot_created() {
    metrics::counter!("slot_booking_slots_total", "op" => "created").increment(1);
}

/// Records a slot deleted.
pub fn record_slot_deleted() {
    metrics::counter!("slot_booking_slots_total", "op" => "deleted").increment(1);
}

/// Records a reservation deleted.
pub fn record_reservation_deleted() {
    metrics::counter!("slot_booking_reservations_deleted_total").increment(1);
}
