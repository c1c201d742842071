//! In-memory reference store.
//!
//! Backs the test suite and small embedded deployments. A single mutex
//! serializes all access, which is also what makes the booking guard
//! atomic: the uniqueness check and the insert happen under one lock
//! acquisition.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use slotbook_engine::RuleSet;

use crate::model::{Booking, BookingId, BookingStatus, EventType, EventTypeId, Host, HostId, NewBooking};
use crate::store::{AvailabilityStore, BookingStore, HostDirectory, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    hosts: Vec<Host>,
    event_types: Vec<EventType>,
    rule_sets: HashMap<HostId, RuleSet>,
    bookings: Vec<Booking>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a host record.
    pub fn add_host(&self, host: Host) -> Host {
        self.lock().hosts.push(host.clone());
        host
    }

    /// Seed an event type record.
    pub fn add_event_type(&self, event_type: EventType) -> EventType {
        self.lock().event_types.push(event_type.clone());
        event_type
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-write;
        // the data is plain records, still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostDirectory for MemoryStore {
    fn host_by_username(&self, username: &str) -> StoreResult<Option<Host>> {
        Ok(self
            .lock()
            .hosts
            .iter()
            .find(|h| h.username == username)
            .cloned())
    }

    fn event_type(&self, host_id: HostId, slug: &str) -> StoreResult<Option<EventType>> {
        Ok(self
            .lock()
            .event_types
            .iter()
            .find(|e| e.host_id == host_id && e.slug == slug)
            .cloned())
    }
}

impl AvailabilityStore for MemoryStore {
    fn rule_set(&self, host_id: HostId) -> StoreResult<RuleSet> {
        Ok(self
            .lock()
            .rule_sets
            .get(&host_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_rule_set(&self, host_id: HostId, rules: RuleSet) -> StoreResult<RuleSet> {
        self.lock().rule_sets.insert(host_id, rules.clone());
        Ok(rules)
    }
}

impl BookingStore for MemoryStore {
    fn confirmed_between(
        &self,
        host_id: HostId,
        event_type_id: EventTypeId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> StoreResult<Vec<Booking>> {
        let inner = self.lock();
        let mut hits: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| {
                b.host_id == host_id
                    && b.event_type_id == event_type_id
                    && b.status == BookingStatus::Confirmed
                    && b.start >= range_start
                    && b.start < range_end
            })
            .cloned()
            .collect();
        hits.sort_by_key(|b| b.start);
        Ok(hits)
    }

    fn create(&self, booking: NewBooking) -> StoreResult<Booking> {
        let mut inner = self.lock();

        // Check and insert under the same lock: this IS the uniqueness
        // constraint, not an advisory pre-read.
        let taken = inner.bookings.iter().any(|b| {
            b.host_id == booking.host_id
                && b.event_type_id == booking.event_type_id
                && b.start == booking.start
                && b.status == BookingStatus::Confirmed
        });
        if taken {
            return Err(StoreError::Conflict);
        }

        let stored = Booking {
            id: Uuid::new_v4(),
            host_id: booking.host_id,
            event_type_id: booking.event_type_id,
            start: booking.start,
            end: booking.end,
            invitee_name: booking.invitee_name,
            invitee_email: booking.invitee_email,
            invitee_timezone: booking.invitee_timezone,
            notes: booking.notes,
            status: BookingStatus::Confirmed,
            created_at: booking.created_at,
        };
        inner.bookings.push(stored.clone());
        Ok(stored)
    }

    fn cancel(&self, host_id: HostId, booking_id: BookingId) -> StoreResult<Option<Booking>> {
        let mut inner = self.lock();
        let Some(booking) = inner
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.host_id == host_id)
        else {
            return Ok(None);
        };
        booking.status = BookingStatus::Cancelled;
        Ok(Some(booking.clone()))
    }

    fn upcoming(&self, host_id: HostId, from: DateTime<Utc>) -> StoreResult<Vec<Booking>> {
        let inner = self.lock();
        let mut hits: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| {
                b.host_id == host_id && b.status == BookingStatus::Confirmed && b.start >= from
            })
            .cloned()
            .collect();
        hits.sort_by_key(|b| b.start);
        Ok(hits)
    }
}
