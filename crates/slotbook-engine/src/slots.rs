//! Slot generation -- expands weekly availability rules over a date range
//! into concrete bookable slots.
//!
//! The expansion walks each calendar day in the host's timezone, carves the
//! matching rule windows into fixed-duration steps, and drops candidates
//! that violate minimum notice or overlap a blocking exception. Output is
//! normalized to UTC instants; callers render in whatever zone they like.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::{resolve_local, GapPolicy};
use crate::rules::{parse_hhmm, DateException, EventConstraints, WeeklyRule};

/// A bookable time slot. Derived, never persisted; `end - start` is always
/// the event duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    /// Half-open interval overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Expand weekly rules over `start_date..=end_date` (interpreted in
/// `timezone`) into bookable slots, under the default DST gap policy.
///
/// Fails soft: an empty or unknown timezone, a zero duration, or an empty
/// rule list all produce an empty result rather than an error -- callers
/// treat "no slots" and "misconfigured host" identically.
pub fn generate_slots(
    timezone: &str,
    weekly: &[WeeklyRule],
    exceptions: &[DateException],
    start_date: NaiveDate,
    end_date: NaiveDate,
    constraints: &EventConstraints,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    generate_slots_with_policy(
        timezone,
        weekly,
        exceptions,
        start_date,
        end_date,
        constraints,
        now,
        GapPolicy::default(),
    )
}

/// Same as [`generate_slots`] with an explicit DST gap policy.
///
/// Ordering of the result is day, then rule order, then time of day.
/// Overlapping rules on the same weekday yield overlapping (possibly
/// duplicate) slots; nothing is deduplicated.
#[allow(clippy::too_many_arguments)]
pub fn generate_slots_with_policy(
    timezone: &str,
    weekly: &[WeeklyRule],
    exceptions: &[DateException],
    start_date: NaiveDate,
    end_date: NaiveDate,
    constraints: &EventConstraints,
    now: DateTime<Utc>,
    policy: GapPolicy,
) -> Vec<Slot> {
    let Ok(tz) = timezone.parse::<Tz>() else {
        return Vec::new();
    };
    if weekly.is_empty() || constraints.duration_minutes == 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(constraints.duration_minutes));
    let earliest_start = now + Duration::minutes(i64::from(constraints.min_notice_minutes));
    let blocked: Vec<&DateException> = exceptions.iter().filter(|ex| !ex.is_available).collect();

    let mut slots = Vec::new();
    let mut day = start_date;
    while day <= end_date {
        let weekday = day.weekday().num_days_from_sunday() as u8;
        for rule in weekly.iter().filter(|r| r.weekday == weekday) {
            // Rules with malformed times contribute nothing.
            let Some((start_h, start_m)) = parse_hhmm(&rule.start_time) else {
                continue;
            };
            let Some((end_h, end_m)) = parse_hhmm(&rule.end_time) else {
                continue;
            };

            // Wall-clock window on this day, shrunk by the buffers before
            // leaving local time.
            let Some(window_start_local) = day
                .and_hms_opt(start_h, start_m, 0)
                .map(|t| t + Duration::minutes(i64::from(constraints.buffer_before)))
            else {
                continue;
            };
            let Some(window_end_local) = day
                .and_hms_opt(end_h, end_m, 0)
                .map(|t| t - Duration::minutes(i64::from(constraints.buffer_after)))
            else {
                continue;
            };
            if window_end_local <= window_start_local {
                continue;
            }

            // Resolve the edges once; the cursor then steps in instant
            // space, so wall-clock times inside a DST gap are never emitted
            // and slot durations stay exact across transitions.
            let Some(window_start) = resolve_local(tz, window_start_local, policy) else {
                continue;
            };
            let Some(window_end) = resolve_local(tz, window_end_local, policy) else {
                continue;
            };
            if window_end <= window_start {
                continue;
            }

            let mut cursor = window_start;
            while cursor + duration <= window_end {
                let slot = Slot {
                    start: cursor,
                    end: cursor + duration,
                };
                cursor += duration;

                if slot.start < earliest_start {
                    continue;
                }
                if blocked
                    .iter()
                    .any(|ex| slot.start < ex.end && slot.end > ex.start)
                {
                    continue;
                }
                slots.push(slot);
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    slots
}
