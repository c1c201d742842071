//! The availability query orchestrator and the booking write path.
//!
//! Reads recompute from current rule and booking state on every call; there
//! is no caching. The only clock is the `now` argument, injected so callers
//! (and tests) control it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use slotbook_engine::{dst, filter_conflicts, generate_slots, RuleSet, Slot};

use crate::error::{ServiceError, ServiceResult};
use crate::model::{
    AvailabilityView, Booking, BookingId, BookingReceipt, BookingRequest, EventSummary, EventType,
    Host, HostId, HostSummary, NewBooking,
};
use crate::notify::{Notifier, NoopNotifier};
use crate::store::{AvailabilityStore, BookingStore, HostDirectory};

/// Composes the storage ports with the slot engine.
pub struct Scheduler<S, N = NoopNotifier> {
    store: S,
    notifier: N,
}

impl<S> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: NoopNotifier,
        }
    }
}

impl<S, N> Scheduler<S, N> {
    pub fn with_notifier(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, N> Scheduler<S, N>
where
    S: HostDirectory + AvailabilityStore + BookingStore,
    N: Notifier,
{
    /// Bookable slots for `username`'s event `slug` over a date range.
    ///
    /// The range defaults to today through six days out in the host's
    /// timezone and is clamped to the event's scheduling horizon. A host
    /// without weekly rules -- or with a timezone the zone database does not
    /// know -- yields an empty slot list, not an error.
    pub fn availability(
        &self,
        username: &str,
        slug: &str,
        range: Option<(NaiveDate, NaiveDate)>,
        now: DateTime<Utc>,
    ) -> ServiceResult<AvailabilityView> {
        let host = self.host(username)?;
        let event = self.event(host.id, slug)?;

        let Ok(tz) = host.timezone.parse::<Tz>() else {
            // An unknown zone cannot anchor wall-clock windows. Same
            // presentation as a host without rules: nothing bookable.
            debug!(timezone = %host.timezone, "unresolvable host timezone");
            let today = now.date_naive();
            let (start_date, end_date) = range.unwrap_or((today, today + Duration::days(6)));
            return Ok(empty_view(&host, &event, start_date, end_date));
        };

        let today = now.with_timezone(&tz).date_naive();
        let (start_date, mut end_date) = range.unwrap_or((today, today + Duration::days(6)));
        if let Some(horizon) = event.max_scheduling_days {
            end_date = end_date.min(today + Duration::days(i64::from(horizon)));
        }

        let rules = self.store.rule_set(host.id)?;
        if rules.weekly.is_empty() {
            return Ok(empty_view(&host, &event, start_date, end_date));
        }

        let constraints = event.constraints();
        let candidates = generate_slots(
            &host.timezone,
            &rules.weekly,
            &rules.exceptions,
            start_date,
            end_date,
            &constraints,
            now,
        );

        // Bookings are fetched for the full-day instant span of the range.
        let range_start = dst::day_start(tz, start_date);
        let range_end = end_date.succ_opt().and_then(|d| dst::day_start(tz, d));
        let busy: Vec<Slot> = match (range_start, range_end) {
            (Some(from), Some(to)) => self
                .store
                .confirmed_between(host.id, event.id, from, to)?
                .iter()
                .map(|b| Slot {
                    start: b.start,
                    end: b.end,
                })
                .collect(),
            _ => Vec::new(),
        };

        let slots = filter_conflicts(&candidates, &busy);
        debug!(
            host = %host.username,
            event = %event.slug,
            candidates = candidates.len(),
            bookable = slots.len(),
            "availability computed"
        );

        Ok(AvailabilityView {
            event: summarize_event(&event),
            host: summarize_host(&host),
            timezone: host.timezone.clone(),
            start_date,
            end_date,
            slots,
        })
    }

    /// Create a confirmed booking at a chosen start instant.
    ///
    /// The slot list shown to the caller may be stale by the time they
    /// submit; the storage guard, not this method, arbitrates the race.
    /// Exactly one of two simultaneous requests for the same start wins;
    /// the other receives [`ServiceError::SlotTaken`].
    pub fn create_booking(
        &self,
        username: &str,
        slug: &str,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<BookingReceipt> {
        if request.invitee_name.trim().is_empty() {
            return Err(ServiceError::Validation("invitee name is required".into()));
        }
        if request.invitee_email.trim().is_empty() {
            return Err(ServiceError::Validation("invitee email is required".into()));
        }

        let host = self.host(username)?;
        let event = self.event(host.id, slug)?;
        let duration = event.constraints().duration_minutes;

        let booking = self.store.create(NewBooking {
            host_id: host.id,
            event_type_id: event.id,
            start: request.start,
            end: request.start + Duration::minutes(i64::from(duration)),
            invitee_name: request.invitee_name,
            invitee_email: request.invitee_email,
            invitee_timezone: request.invitee_timezone,
            notes: request.notes,
            created_at: now,
        })?;

        let receipt = BookingReceipt {
            booking,
            event: summarize_event(&event),
            host: summarize_host(&host),
        };

        // Committed. Notification is best-effort from here on; a delivery
        // failure must never roll back the booking.
        if let Err(err) = self.notifier.booking_confirmed(&receipt) {
            warn!(booking = %receipt.booking.id, error = %err, "confirmation notification failed");
        }

        Ok(receipt)
    }

    /// The host's stored rule document; empty when none was ever saved.
    pub fn rules(&self, host_id: HostId) -> ServiceResult<RuleSet> {
        Ok(self.store.rule_set(host_id)?)
    }

    /// Replace the host's rule document wholesale after validating it.
    pub fn replace_rules(&self, host_id: HostId, rules: RuleSet) -> ServiceResult<RuleSet> {
        rules.validate()?;
        Ok(self.store.replace_rule_set(host_id, rules)?)
    }

    /// Cancel a booking. One-way: there is no un-cancel, and cancelling an
    /// already-cancelled booking is a no-op.
    pub fn cancel_booking(&self, host_id: HostId, booking_id: BookingId) -> ServiceResult<Booking> {
        self.store
            .cancel(host_id, booking_id)?
            .ok_or(ServiceError::NotFound("booking"))
    }

    /// The host's confirmed future bookings, soonest first.
    pub fn upcoming_bookings(
        &self,
        host_id: HostId,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Booking>> {
        Ok(self.store.upcoming(host_id, now)?)
    }

    fn host(&self, username: &str) -> ServiceResult<Host> {
        self.store
            .host_by_username(username)?
            .ok_or(ServiceError::NotFound("host"))
    }

    fn event(&self, host_id: HostId, slug: &str) -> ServiceResult<EventType> {
        self.store
            .event_type(host_id, slug)?
            .ok_or(ServiceError::NotFound("event type"))
    }
}

fn summarize_host(host: &Host) -> HostSummary {
    HostSummary {
        name: host.name.clone(),
        username: host.username.clone(),
    }
}

fn summarize_event(event: &EventType) -> EventSummary {
    EventSummary {
        id: event.id,
        title: event.title.clone(),
        description: event.description.clone(),
        duration_minutes: event.constraints().duration_minutes,
    }
}

fn empty_view(
    host: &Host,
    event: &EventType,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> AvailabilityView {
    AvailabilityView {
        event: summarize_event(event),
        host: summarize_host(host),
        timezone: host.timezone.clone(),
        start_date,
        end_date,
        slots: Vec::new(),
    }
}
