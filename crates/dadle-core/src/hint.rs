//! Availability hints and the overlap resolver.

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::interval::Interval;
use crate::poll::NormalizedInterval;
use crate::suggestion::{YesNoMaybe, derive_suggestion};

/// The user's calendar events that conflict with one poll option.
///
/// Event order carries no meaning; compare hints by set membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityHint {
    /// The id of the poll option this hint belongs to.
    #[serde(rename = "option")]
    pub option_id: String,
    /// Events overlapping the option.
    pub overlapping_events: Vec<CalendarEvent>,
}

impl AvailabilityHint {
    /// Creates a new hint.
    pub fn new(option_id: impl Into<String>, overlapping_events: Vec<CalendarEvent>) -> Self {
        Self {
            option_id: option_id.into(),
            overlapping_events,
        }
    }

    /// Returns `true` if any event overlaps the option.
    pub fn has_conflicts(&self) -> bool {
        !self.overlapping_events.is_empty()
    }

    /// Derives the suggested response for this option.
    pub fn suggestion(&self) -> YesNoMaybe {
        derive_suggestion(&self.overlapping_events)
    }
}

/// Returns the events from `events` that overlap `interval`.
pub fn overlapping_events(interval: &Interval, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| event.overlaps(interval))
        .cloned()
        .collect()
}

/// Builds one hint per normalized option, in option order.
///
/// A plain scan over all events per option; option counts are small and
/// event counts stay in the low hundreds.
pub fn resolve_overlaps(
    intervals: &[NormalizedInterval],
    events: &[CalendarEvent],
) -> Vec<AvailabilityHint> {
    intervals
        .iter()
        .map(|option| {
            AvailabilityHint::new(
                option.option_id.clone(),
                overlapping_events(&option.interval(), events),
            )
        })
        .collect()
}

/// Returns the window spanning every normalized option, or `None` if there
/// are none.
pub fn query_window(intervals: &[NormalizedInterval]) -> Option<Interval> {
    Interval::covering(intervals.iter().map(NormalizedInterval::interval))
}
