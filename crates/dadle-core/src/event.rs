//! Calendar events as reported by providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// How an event occupies the user's time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// The user is busy.
    Confirmed,
    /// The user might be busy.
    Tentative,
    /// The event does not block the user's time.
    Free,
}

impl EventStatus {
    /// Maps a Google-style event `status` field.
    ///
    /// `confirmed` and `tentative` map directly; anything else (including a
    /// missing value) is treated as free.
    pub fn from_event_status(status: Option<&str>) -> Self {
        match status {
            Some("confirmed") => Self::Confirmed,
            Some("tentative") => Self::Tentative,
            _ => Self::Free,
        }
    }

    /// Maps a Microsoft Graph-style `showAs` field.
    ///
    /// `free` and `tentative` map directly; everything else (busy, oof,
    /// workingElsewhere, unknown, missing) blocks the user's time.
    pub fn from_show_as(show_as: Option<&str>) -> Self {
        match show_as {
            Some("free") => Self::Free,
            Some("tentative") => Self::Tentative,
            _ => Self::Confirmed,
        }
    }

    /// Returns the status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Tentative => "tentative",
            Self::Free => "free",
        }
    }
}

/// A calendar event fetched from a provider.
///
/// Events are produced fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// The event title; empty if the provider returned none.
    pub title: String,
    /// When the event starts.
    pub start: DateTime<Utc>,
    /// When the event ends (exclusive).
    pub end: DateTime<Utc>,
    /// How the event occupies the user's time.
    pub status: EventStatus,
}

impl CalendarEvent {
    /// Creates a new event.
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: EventStatus,
    ) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            status,
        }
    }

    /// Returns the time occupied by this event.
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    /// Checks whether this event shares at least one instant with `interval`.
    pub fn overlaps(&self, interval: &Interval) -> bool {
        interval.overlaps(&self.interval())
    }
}
