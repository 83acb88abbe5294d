//! Suggested responses derived from calendar conflicts.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventStatus};
use crate::hint::AvailabilityHint;

/// A participant's response to a poll option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNoMaybe {
    Yes,
    No,
    Maybe,
}

/// Maps the events overlapping an option to a suggested response.
///
/// Any confirmed event yields `No`; otherwise any tentative event yields
/// `Maybe`; otherwise (no events, or only free ones) `Yes`.
pub fn derive_suggestion<'a, I>(events: I) -> YesNoMaybe
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut suggestion = YesNoMaybe::Yes;
    for event in events {
        match event.status {
            EventStatus::Confirmed => return YesNoMaybe::No,
            EventStatus::Tentative => suggestion = YesNoMaybe::Maybe,
            EventStatus::Free => {}
        }
    }
    suggestion
}

/// A participant's choice for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollChoice {
    /// The option id.
    pub option: String,
    pub choice: YesNoMaybe,
}

impl PollChoice {
    /// Creates a new choice.
    pub fn new(option: impl Into<String>, choice: YesNoMaybe) -> Self {
        Self {
            option: option.into(),
            choice,
        }
    }
}

/// Pre-fills a participation from availability hints.
///
/// Every existing choice is kept untouched. Each hinted option the
/// participant has not answered yet gets the hint's suggestion appended,
/// in hint order.
pub fn prefill_choices(existing: &[PollChoice], hints: &[AvailabilityHint]) -> Vec<PollChoice> {
    let answered: HashSet<&str> = existing.iter().map(|c| c.option.as_str()).collect();

    let suggested = hints
        .iter()
        .filter(|hint| !answered.contains(hint.option_id.as_str()))
        .map(|hint| PollChoice::new(hint.option_id.clone(), hint.suggestion()));

    existing.iter().cloned().chain(suggested).collect()
}
