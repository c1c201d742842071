//! Wall-clock resolution policies around DST transitions.
//!
//! Rule windows are written in local time, so every expansion has to map
//! wall-clock times onto instants. Most of the year that mapping is 1:1;
//! on transition days it is not, and the policy here decides what happens.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// What to do when a rule window edge names a wall-clock time that does not
/// exist on a given day (spring-forward gap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Drop that rule window for that day.
    #[default]
    Skip,
    /// Move the edge to the first wall-clock time that exists after the gap.
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (the repeated hour on fall-back days) resolve to the
/// earliest instant. Nonexistent times follow `policy`.
pub fn resolve_local(tz: Tz, local: NaiveDateTime, policy: GapPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            GapPolicy::Skip => None,
            GapPolicy::ShiftForward => shift_past_gap(tz, local),
        },
    }
}

/// Instant at which a calendar date begins in `tz`.
///
/// Midnight itself falls inside a DST gap in some zones, so the boundary
/// shifts forward to the first existing wall-clock time in that case.
pub fn day_start(tz: Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    resolve_local(tz, midnight, GapPolicy::ShiftForward)
}

/// Probe forward in 5-minute steps until the wall clock exists again.
/// Gaps are at most a few hours; give up after a full day.
fn shift_past_gap(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let mut probe = local;
    for _ in 0..288 {
        probe += Duration::minutes(5);
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest.with_timezone(&Utc)),
            LocalResult::None => continue,
        }
    }
    None
}
