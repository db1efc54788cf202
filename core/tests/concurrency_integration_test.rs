//! Concurrency integration tests.
//!
//! Races for the last seat and for the same email inside one process. The
//! store is slowed down so every submission's reads overlap the others'.
//!
//! Run with: `cargo test -p slot-booking-core --test concurrency_integration_test`

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use slot_booking_core::error::BookingError;
use slot_booking_core::types::SlotId;
use slot_booking_testing::fixtures::{self, RESERVATIONS, candidate};
use slot_booking_testing::test_clock;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_seat_race_has_one_winner() {
    let store = fixtures::seeded_store(&[(1, "Acme Corp", 1)])
        .with_latency(Duration::from_millis(5));
    let service = Arc::new(fixtures::service(&store, test_clock()));

    let tasks: Vec<_> = (0..10)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .engine()
                    .submit(&candidate(&format!("student{i}@example.com"), 1).build())
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    let mut full = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(BookingError::SlotFull(SlotId(1))) => full += 1,
            Err(other) => unreachable!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(full, 9);
    assert_eq!(store.rows(RESERVATIONS).len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_email_race_books_once() {
    let store = fixtures::seeded_store(&[(1, "Acme Corp", 5), (2, "Globex", 5)])
        .with_latency(Duration::from_millis(5));
    let service = Arc::new(fixtures::service(&store, test_clock()));

    let tasks: Vec<_> = [1, 2, 1, 2]
        .into_iter()
        .map(|slot| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .engine()
                    .submit(&candidate("same@example.com", slot).build())
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == BookingError::DuplicateEmail)
    );
    assert_eq!(store.rows(RESERVATIONS).len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_holds_under_concurrent_load() {
    let store = fixtures::seeded_store(&[(1, "Acme Corp", 3), (2, "Globex", 2)])
        .with_latency(Duration::from_millis(2));
    let service = Arc::new(fixtures::service(&store, test_clock()));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let service = Arc::clone(&service);
            let slot = if i % 2 == 0 { 1 } else { 2 };
            tokio::spawn(async move {
                service
                    .engine()
                    .submit(&candidate(&format!("s{i}@example.com"), slot).build())
                    .await
            })
        })
        .collect();
    for task in tasks {
        let _ = task.await.unwrap();
    }

    let reservations = service.roster().list_reservations().await.unwrap();
    let in_slot = |id| {
        reservations
            .iter()
            .filter(|r| r.assigned_slot_id == SlotId(id))
            .count()
    };
    assert_eq!(in_slot(1), 3);
    assert_eq!(in_slot(2), 2);

    let mut ids: Vec<_> = reservations.iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}
