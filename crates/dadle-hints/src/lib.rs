//! Availability hint engine.
//!
//! Given a poll's options and a user's linked calendars, computes per
//! option the user's events that conflict with it:
//!
//! 1. Date/DateTime options are normalized into UTC intervals in the poll's
//!    timezone; Arbitrary options are dropped.
//! 2. The [`EventAggregator`] fetches the span of all options from every
//!    enabled calendar concurrently. Failing or slow calendars are recorded
//!    and skipped.
//! 3. Each option collects the events overlapping it.
//!
//! ```ignore
//! let engine = HintEngine::new(Arc::new(registry), HintConfig::load_from(path)?);
//! let report = engine.compute(&poll.options, &poll.timezone, &user.calendars).await?;
//! for hint in &report.hints {
//!     println!("{}: {:?}", hint.option_id, hint.suggestion());
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod health;

pub use aggregator::{Aggregation, CalendarFailure, EventAggregator};
pub use config::HintConfig;
pub use engine::{HintEngine, HintReport, compute_availability_hints};
pub use error::{ConfigError, ConfigResult};
pub use health::{CalendarHealth, check_calendar_health};
