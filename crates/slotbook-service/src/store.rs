//! Storage ports: the external collaborators the scheduler composes.
//!
//! The engine never talks to a database itself; it consumes these traits.
//! [`crate::memory::MemoryStore`] is the reference implementation. A real
//! backend maps each port onto its own tables or collections, keeping the
//! uniqueness guard in [`BookingStore::create`] atomic with the insert.

use chrono::{DateTime, Utc};
use thiserror::Error;

use slotbook_engine::RuleSet;

use crate::model::{Booking, BookingId, EventType, EventTypeId, Host, HostId, NewBooking};

/// Failures surfaced by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A confirmed booking already occupies the same
    /// (host, event type, start) triple.
    #[error("slot already booked")]
    Conflict,

    /// Anything else the backend reports. Propagated uninterpreted.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookup of hosts and their event types.
pub trait HostDirectory {
    fn host_by_username(&self, username: &str) -> StoreResult<Option<Host>>;
    fn event_type(&self, host_id: HostId, slug: &str) -> StoreResult<Option<EventType>>;
}

/// Persistence of a host's availability rule document.
///
/// The document is replaced wholesale on save; a host that never saved one
/// has the empty rule set.
pub trait AvailabilityStore {
    fn rule_set(&self, host_id: HostId) -> StoreResult<RuleSet>;
    fn replace_rule_set(&self, host_id: HostId, rules: RuleSet) -> StoreResult<RuleSet>;
}

/// Persistence of bookings, including the write-time conflict guard.
pub trait BookingStore {
    /// Confirmed bookings for the host and event type with `start` in
    /// `[range_start, range_end)`, ascending by start.
    fn confirmed_between(
        &self,
        host_id: HostId,
        event_type_id: EventTypeId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> StoreResult<Vec<Booking>>;

    /// Insert a confirmed booking.
    ///
    /// Must enforce, atomically with the insert, that no confirmed booking
    /// already exists for the same (host, event type, start) triple --
    /// returning [`StoreError::Conflict`] when one does. A read-then-write
    /// check in the caller is not a substitute: two concurrent requests for
    /// the same slot must resolve to exactly one success. Cancelled
    /// bookings never count against the triple.
    fn create(&self, booking: NewBooking) -> StoreResult<Booking>;

    /// Mark a booking cancelled. Returns `None` when no such booking exists
    /// for this host. Cancelling an already-cancelled booking is a no-op.
    fn cancel(&self, host_id: HostId, booking_id: BookingId) -> StoreResult<Option<Booking>>;

    /// Confirmed bookings starting at or after `from`, ascending by start.
    fn upcoming(&self, host_id: HostId, from: DateTime<Utc>) -> StoreResult<Vec<Booking>>;
}
