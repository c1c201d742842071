//! Domain records shared by the storage ports and the scheduler.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use slotbook_engine::{EventConstraints, Slot};

pub type HostId = Uuid;
pub type EventTypeId = Uuid;
pub type BookingId = Uuid;

/// A host whose calendar can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub name: String,
    pub username: String,
    pub email: String,
    /// IANA timezone name, e.g. `"Europe/Berlin"`.
    pub timezone: String,
}

impl Host {
    pub fn new(name: &str, username: &str, email: &str, timezone: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            timezone: timezone.to_string(),
        }
    }
}

/// A bookable meeting definition owned by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: EventTypeId,
    pub host_id: HostId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub duration_minutes: Option<u32>,
    pub buffer_before: u32,
    pub buffer_after: u32,
    pub min_notice_minutes: Option<u32>,
    /// How far ahead bookings may be requested, in days from today.
    /// Requested availability ranges are clamped to this horizon.
    pub max_scheduling_days: Option<u32>,
}

impl EventType {
    pub fn new(host_id: HostId, title: &str, slug: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            host_id,
            title: title.to_string(),
            slug: slug.to_string(),
            description: None,
            duration_minutes: None,
            buffer_before: 0,
            buffer_after: 0,
            min_notice_minutes: None,
            max_scheduling_days: None,
        }
    }

    /// Constraints with engine defaults filled in where the event type
    /// leaves them unset (duration 30, minimum notice 60).
    pub fn constraints(&self) -> EventConstraints {
        let defaults = EventConstraints::default();
        EventConstraints {
            duration_minutes: self.duration_minutes.unwrap_or(defaults.duration_minutes),
            buffer_before: self.buffer_before,
            buffer_after: self.buffer_after,
            min_notice_minutes: self
                .min_notice_minutes
                .unwrap_or(defaults.min_notice_minutes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A confirmed (or since-cancelled) meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub host_id: HostId,
    pub event_type_id: EventTypeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Input to the public booking write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub start: DateTime<Utc>,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: Option<String>,
    pub notes: Option<String>,
}

/// Everything a store needs to insert a booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub host_id: HostId,
    pub event_type_id: EventTypeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub invitee_name: String,
    pub invitee_email: String,
    pub invitee_timezone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Host fields exposed on public responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    pub name: String,
    pub username: String,
}

/// Event-type fields exposed on public responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: EventTypeId,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
}

/// Result of an availability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityView {
    pub event: EventSummary,
    pub host: HostSummary,
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slots: Vec<Slot>,
}

/// A committed booking together with its event and host context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub event: EventSummary,
    pub host: HostSummary,
}
