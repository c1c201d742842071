//! Validation error types for availability rules.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("weekday out of range: {0} (expected 0=Sunday..6=Saturday)")]
    Weekday(u8),

    #[error("invalid wall-clock time {0:?} (expected zero-padded 24h \"HH:MM\")")]
    Time(String),

    #[error("weekly window {start:?}..{end:?} is empty or inverted")]
    Window { start: String, end: String },

    #[error("exception range {start}..{end} is empty or inverted")]
    ExceptionRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, RuleError>;
