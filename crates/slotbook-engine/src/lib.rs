//! # slotbook-engine
//!
//! Timezone-aware slot generation for meeting scheduling.
//!
//! Given a host's weekly availability rules (wall-clock windows per weekday),
//! date-range exceptions, and per-event constraints (duration, buffers,
//! minimum notice), the engine derives the concrete bookable slots over a
//! requested date range -- correct across timezones and DST transitions -- and
//! filters out slots that collide with confirmed bookings.
//!
//! Everything here is pure: `now` is an injected parameter and no module
//! performs I/O. Persistence, orchestration, and the write-time booking
//! guard live in `slotbook-service`.
//!
//! ## Modules
//!
//! - [`rules`] — weekly rules, date exceptions, and event constraints
//! - [`slots`] — rule expansion over a date range into bookable slots
//! - [`conflict`] — read-time filtering against existing bookings
//! - [`dst`] — wall-clock resolution policies around DST transitions
//! - [`error`] — validation error types

pub mod conflict;
pub mod dst;
pub mod error;
pub mod rules;
pub mod slots;

pub use conflict::filter_conflicts;
pub use dst::GapPolicy;
pub use error::RuleError;
pub use rules::{DateException, EventConstraints, RuleSet, WeeklyRule};
pub use slots::{generate_slots, generate_slots_with_policy, Slot};
