//! Outbound notification hooks.
//!
//! Notification is strictly best-effort: the scheduler fires it after the
//! booking is committed, and a failure never rolls the booking back.
//! Actual delivery (SMTP, webhooks) belongs to the embedding application.

use crate::model::BookingReceipt;

pub trait Notifier {
    fn booking_confirmed(&self, receipt: &BookingReceipt) -> anyhow::Result<()>;
}

/// Discards every notification. The default when no delivery channel is
/// wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn booking_confirmed(&self, _receipt: &BookingReceipt) -> anyhow::Result<()> {
        Ok(())
    }
}
