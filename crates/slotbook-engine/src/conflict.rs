//! Read-time filtering of candidate slots against confirmed bookings.
//!
//! Adjacent intervals (one ending exactly when another starts) do NOT
//! conflict.

use crate::slots::Slot;

/// Remove candidates that overlap any busy interval.
///
/// Overlap is half-open: a slot ending exactly when a booking starts, or
/// starting exactly when one ends, survives. The filter performs no status
/// checks -- callers pass only the intervals that should block, already
/// restricted to the host, event type, and date range being queried.
///
/// This is best-effort read-side hygiene. Two clients can race past it; the
/// storage-level uniqueness guard is what actually prevents double booking.
pub fn filter_conflicts(slots: &[Slot], busy: &[Slot]) -> Vec<Slot> {
    slots
        .iter()
        .filter(|slot| !busy.iter().any(|b| slot.overlaps(b)))
        .copied()
        .collect()
}
