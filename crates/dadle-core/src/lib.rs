//! Core types for availability hints: intervals, poll options, calendar
//! events, suggestions.
//!
//! ```text
//! PollOption ──normalize_options()──▶ NormalizedInterval ─┐
//!                                                           ├─ resolve_overlaps() ─▶ AvailabilityHint
//! CalendarEvent (from providers) ─────────────────────────┘                          │
//!                                                                          derive_suggestion()
//!                                                                                     ▼
//!                                                                                YesNoMaybe
//! ```

pub mod error;
pub mod event;
pub mod hint;
pub mod interval;
pub mod poll;
pub mod suggestion;
pub mod tracing;

pub use error::{ValidationError, ValidationResult};
pub use event::{CalendarEvent, EventStatus};
pub use hint::{AvailabilityHint, overlapping_events, query_window, resolve_overlaps};
pub use interval::{Interval, overlaps};
pub use poll::{
    NormalizedInterval, OptionKind, PollOption, civil_to_utc, normalize_option,
    normalize_options, parse_civil, parse_timezone,
};
pub use suggestion::{PollChoice, YesNoMaybe, derive_suggestion, prefill_choices};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
