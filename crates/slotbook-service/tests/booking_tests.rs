//! Tests for the booking write path and its conflict guard.

use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::anyhow;
use chrono::{DateTime, Duration, TimeZone, Utc};
use slotbook_service::ics::booking_ics;
use slotbook_service::model::{BookingId, BookingReceipt, BookingRequest, BookingStatus, EventType, Host, NewBooking};
use slotbook_service::store::{BookingStore, StoreError};
use slotbook_service::{MemoryStore, Notifier, Scheduler, ServiceError};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn seeded_store() -> (MemoryStore, Host, EventType) {
    let store = MemoryStore::new();
    let host = store.add_host(Host::new(
        "Maya Lindqvist",
        "maya",
        "maya@example.com",
        "UTC",
    ));
    let event = store.add_event_type(EventType {
        duration_minutes: Some(30),
        ..EventType::new(host.id, "Intro call", "intro")
    });
    (store, host, event)
}

fn request(start: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        start,
        invitee_name: "Ann Ashby".to_string(),
        invitee_email: "ann@example.com".to_string(),
        invitee_timezone: Some("Europe/Berlin".to_string()),
        notes: Some("Looking forward to it".to_string()),
    }
}

fn new_booking(host: &Host, event: &EventType, start: DateTime<Utc>) -> NewBooking {
    NewBooking {
        host_id: host.id,
        event_type_id: event.id,
        start,
        end: start + Duration::minutes(30),
        invitee_name: "Ann Ashby".to_string(),
        invitee_email: "ann@example.com".to_string(),
        invitee_timezone: None,
        notes: None,
        created_at: utc(2026, 1, 1, 0, 0),
    }
}

// ── Write path ──────────────────────────────────────────────────────────────

#[test]
fn booking_succeeds_and_reports_context() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let receipt = scheduler
        .create_booking("maya", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 0))
        .unwrap();

    assert_eq!(receipt.booking.status, BookingStatus::Confirmed);
    assert_eq!(receipt.booking.start, utc(2026, 3, 2, 9, 0));
    assert_eq!(receipt.booking.end, utc(2026, 3, 2, 9, 30));
    assert_eq!(receipt.event.title, "Intro call");
    assert_eq!(receipt.host.username, "maya");
}

#[test]
fn duplicate_start_is_rejected_as_slot_taken() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);
    let start = utc(2026, 3, 2, 9, 0);

    scheduler
        .create_booking("maya", "intro", request(start), utc(2026, 3, 1, 8, 0))
        .unwrap();
    let err = scheduler
        .create_booking("maya", "intro", request(start), utc(2026, 3, 1, 8, 5))
        .unwrap_err();

    assert!(matches!(err, ServiceError::SlotTaken));
}

#[test]
fn blank_invitee_name_is_rejected() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let mut bad = request(utc(2026, 3, 2, 9, 0));
    bad.invitee_name = "   ".to_string();
    let err = scheduler
        .create_booking("maya", "intro", bad, utc(2026, 3, 1, 8, 0))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn blank_invitee_email_is_rejected() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let mut bad = request(utc(2026, 3, 2, 9, 0));
    bad.invitee_email = String::new();
    let err = scheduler
        .create_booking("maya", "intro", bad, utc(2026, 3, 1, 8, 0))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn booking_for_unknown_host_is_not_found() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let err = scheduler
        .create_booking("ghost", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 0))
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound("host")));
}

// ── The conflict guard ──────────────────────────────────────────────────────

#[test]
fn concurrent_requests_for_one_slot_have_exactly_one_winner() {
    let (store, host, event) = seeded_store();
    let store = Arc::new(store);
    let start = utc(2026, 3, 2, 9, 0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let booking = new_booking(&host, &event, start);
            thread::spawn(move || store.create(booking))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Conflict)))
        .count();

    assert_eq!(wins, 1, "exactly one concurrent request may win");
    assert_eq!(conflicts, 7, "all losers must see the conflict signal");
}

#[test]
fn cancelled_start_can_be_rebooked() {
    let (store, host, _) = seeded_store();
    let scheduler = Scheduler::new(store);
    let start = utc(2026, 3, 2, 9, 0);

    let first = scheduler
        .create_booking("maya", "intro", request(start), utc(2026, 3, 1, 8, 0))
        .unwrap();
    scheduler
        .cancel_booking(host.id, first.booking.id)
        .unwrap();

    // The triple is free again once the holder is cancelled.
    let second = scheduler
        .create_booking("maya", "intro", request(start), utc(2026, 3, 1, 9, 0))
        .unwrap();
    assert_eq!(second.booking.start, start);
}

#[test]
fn cancel_of_unknown_booking_is_not_found() {
    let (store, host, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let err = scheduler
        .cancel_booking(host.id, BookingId::new_v4())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("booking")));
}

// ── Notification ────────────────────────────────────────────────────────────

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn booking_confirmed(&self, _receipt: &BookingReceipt) -> anyhow::Result<()> {
        Err(anyhow!("smtp relay down"))
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    seen: Arc<Mutex<Vec<BookingId>>>,
}

impl Notifier for RecordingNotifier {
    fn booking_confirmed(&self, receipt: &BookingReceipt) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(receipt.booking.id);
        Ok(())
    }
}

#[test]
fn notification_failure_never_fails_the_booking() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::with_notifier(store, FailingNotifier);

    let receipt = scheduler
        .create_booking("maya", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 0))
        .unwrap();

    assert_eq!(receipt.booking.status, BookingStatus::Confirmed);
}

#[test]
fn notifier_fires_once_per_committed_booking() {
    let (store, _, _) = seeded_store();
    let notifier = RecordingNotifier::default();
    let seen = Arc::clone(&notifier.seen);
    let scheduler = Scheduler::with_notifier(store, notifier);

    let receipt = scheduler
        .create_booking("maya", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 0))
        .unwrap();
    // A rejected duplicate must not notify.
    let _ = scheduler.create_booking("maya", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 5));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[receipt.booking.id]);
}

// ── Confirmation payload ────────────────────────────────────────────────────

#[test]
fn ics_payload_carries_the_booking() {
    let (store, _, _) = seeded_store();
    let scheduler = Scheduler::new(store);

    let receipt = scheduler
        .create_booking("maya", "intro", request(utc(2026, 3, 2, 9, 0)), utc(2026, 3, 1, 8, 0))
        .unwrap();
    let ics = booking_ics(&receipt);

    assert!(ics.contains("BEGIN:VCALENDAR"));
    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("STATUS:CONFIRMED"));
    assert!(ics.contains(&format!("booking-{}@slotbook", receipt.booking.id)));
    assert!(ics.contains("Intro call with Maya Lindqvist"));
}
