//! Weekly availability rules, date exceptions, and event constraints.
//!
//! Rules are pure data: a host's recurring availability expressed as
//! wall-clock windows per weekday, plus concrete date-range overrides.
//! Expansion into bookable slots lives in [`crate::slots`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};

/// A recurring weekly availability window in the host's local time.
///
/// Several rules may share a weekday; overlapping windows are legal and
/// simply yield overlapping candidate slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRule {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    /// Window start as zero-padded 24h wall-clock time, e.g. `"09:00"`.
    pub start_time: String,
    /// Window end (exclusive), same format. Must sort after `start_time`.
    pub end_time: String,
}

impl WeeklyRule {
    pub fn validate(&self) -> Result<()> {
        if self.weekday > 6 {
            return Err(RuleError::Weekday(self.weekday));
        }
        let start = parse_hhmm(&self.start_time)
            .ok_or_else(|| RuleError::Time(self.start_time.clone()))?;
        let end =
            parse_hhmm(&self.end_time).ok_or_else(|| RuleError::Time(self.end_time.clone()))?;
        if start >= end {
            return Err(RuleError::Window {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            });
        }
        Ok(())
    }
}

/// A concrete date-range override of the weekly rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateException {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `false` removes any overlapping candidate slot. `true` is stored and
    /// validated but does not mint slots outside the weekly rules.
    pub is_available: bool,
}

impl DateException {
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(RuleError::ExceptionRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A host's full availability document. Replaced wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub weekly: Vec<WeeklyRule>,
    pub exceptions: Vec<DateException>,
}

impl RuleSet {
    pub fn validate(&self) -> Result<()> {
        for rule in &self.weekly {
            rule.validate()?;
        }
        for exception in &self.exceptions {
            exception.validate()?;
        }
        Ok(())
    }
}

/// How a weekly window is carved into discrete bookable slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConstraints {
    pub duration_minutes: u32,
    pub buffer_before: u32,
    pub buffer_after: u32,
    pub min_notice_minutes: u32,
}

impl Default for EventConstraints {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            buffer_before: 0,
            buffer_after: 0,
            min_notice_minutes: 60,
        }
    }
}

/// Parse a zero-padded 24h `"HH:MM"` string into hour and minute.
pub fn parse_hhmm(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}
