//! iCalendar payloads for booking confirmations.

use icalendar::{Calendar, Component, EventLike};

use crate::model::BookingReceipt;

/// Build the VCALENDAR body attached to confirmation messages.
///
/// Times are emitted in UTC; the receiving calendar client renders them in
/// the viewer's own timezone.
pub fn booking_ics(receipt: &BookingReceipt) -> String {
    let booking = &receipt.booking;

    let mut event = icalendar::Event::new();
    event.uid(&format!("booking-{}@slotbook", booking.id));
    event.summary(&format!(
        "{} with {}",
        receipt.event.title, receipt.host.name
    ));
    event.starts(booking.start);
    event.ends(booking.end);

    let mut description = format!(
        "Event: {}\nHost: {}\nInvitee: {} <{}>",
        receipt.event.title, receipt.host.name, booking.invitee_name, booking.invitee_email
    );
    if let Some(notes) = &booking.notes {
        description.push_str("\nNotes: ");
        description.push_str(notes);
    }
    event.description(&description);
    event.add_property("STATUS", "CONFIRMED");
    let event = event.done();

    let mut calendar = Calendar::new();
    calendar.push(event);
    let calendar = calendar.done();
    calendar.to_string()
}
