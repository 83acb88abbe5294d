//! Concurrent event collection across a user's calendars.
//!
//! One fetch is issued per enabled calendar and all fetches run at once on
//! the calling task. The aggregator waits until every fetch has settled,
//! successfully or not, then flattens the results.
//!
//! # Failure containment
//!
//! A failing calendar never fails the aggregation. Provider errors,
//! unregistered provider tags and timeouts are all recorded as a
//! [`CalendarFailure`], logged, and that calendar contributes no events.
//! Dropping the aggregation future abandons every in-flight fetch.

use std::time::Duration;

use dadle_core::{CalendarEvent, Interval};
use dadle_providers::{Calendar, ProviderError, ProviderRegistry, ProviderResult};
use futures_util::future::join_all;
use tracing::{debug, warn};

/// A calendar whose fetch failed.
#[derive(Debug)]
pub struct CalendarFailure {
    /// Identifier of the link record.
    pub calendar_id: String,
    /// Provider tag of the calendar.
    pub provider: String,
    pub error: ProviderError,
}

/// The flattened outcome of one fan-out.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Events from every calendar that answered, in no particular order.
    pub events: Vec<CalendarEvent>,
    /// Calendars that contributed nothing because their fetch failed.
    pub failures: Vec<CalendarFailure>,
    /// Number of calendars a fetch was issued for.
    pub calendars_queried: usize,
}

impl Aggregation {
    /// Returns true if every queried calendar answered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans out event fetches to the providers of a user's calendars.
#[derive(Debug, Clone, Copy)]
pub struct EventAggregator<'r> {
    registry: &'r ProviderRegistry,
    fetch_timeout: Duration,
}

impl<'r> EventAggregator<'r> {
    /// Creates an aggregator using `fetch_timeout` for adapters that do not
    /// set their own.
    pub fn new(registry: &'r ProviderRegistry, fetch_timeout: Duration) -> Self {
        Self {
            registry,
            fetch_timeout,
        }
    }

    /// Collects the events of every enabled calendar intersecting `window`.
    pub async fn collect(&self, calendars: &[Calendar], window: Interval) -> Aggregation {
        let enabled = Calendar::participating(calendars, true);
        let calendars_queried = enabled.len();

        let outcomes = join_all(
            enabled
                .into_iter()
                .map(|calendar| async move { (calendar, self.fetch(calendar, window).await) }),
        )
        .await;

        let mut aggregation = Aggregation {
            calendars_queried,
            ..Aggregation::default()
        };

        for (calendar, outcome) in outcomes {
            match outcome {
                Ok(events) => {
                    debug!(
                        calendar = %calendar.id,
                        provider = %calendar.provider,
                        event_count = events.len(),
                        "Fetched calendar events"
                    );
                    aggregation.events.extend(events);
                }
                Err(error) => {
                    warn!(
                        calendar = %calendar.id,
                        provider = %calendar.provider,
                        code = %error.code(),
                        error = %error,
                        "Calendar fetch failed; continuing without its events"
                    );
                    aggregation.failures.push(CalendarFailure {
                        calendar_id: calendar.id.clone(),
                        provider: calendar.provider.clone(),
                        error,
                    });
                }
            }
        }

        aggregation
    }

    /// Fetches one calendar, bounded by the applicable timeout.
    ///
    /// Does not look at `calendar.enabled`.
    pub async fn fetch(
        &self,
        calendar: &Calendar,
        window: Interval,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let provider = self.registry.resolve(calendar)?;
        let limit = provider.fetch_timeout().unwrap_or(self.fetch_timeout);

        match tokio::time::timeout(limit, provider.fetch_events(calendar, window)).await {
            Ok(Ok(events)) => Ok(events),
            Ok(Err(error)) if error.provider().is_none() => {
                Err(error.with_provider(&calendar.provider))
            }
            Ok(Err(error)) => Err(error),
            Err(_elapsed) => Err(ProviderError::timeout(limit).with_provider(&calendar.provider)),
        }
    }
}
