//! The adapter seam between the hint engine and calendar services.
//!
//! A [`CalendarProvider`] is the adapter for one external calendar service
//! (Google Calendar, Microsoft 365, ...). Given a linked [`Calendar`] and a
//! time window it returns every event intersecting the window, already
//! mapped to [`CalendarEvent`]. Adapters own their own paging, token
//! refresh and retry policy.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use dadle_core::{CalendarEvent, Interval};

use crate::calendar::Calendar;
use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};

/// Future returned by [`CalendarProvider::fetch_events`].
///
/// Boxed so adapters can sit behind `Arc<dyn CalendarProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Adapter for one external calendar service.
///
/// # Contract
///
/// - Implementations must be `Send + Sync`; one instance serves every
///   calendar carrying its provider tag, concurrently.
/// - `fetch_events` should return every event intersecting `window`,
///   following pagination internally. Extra events outside the window are
///   harmless; missing ones are not.
/// - Recurring events must be expanded into single instances.
///
/// # Example
///
/// ```ignore
/// struct GraphProvider {
///     client: reqwest::Client,
/// }
///
/// impl CalendarProvider for GraphProvider {
///     fn name(&self) -> &str { "microsoft" }
///
///     fn fetch_events<'a>(
///         &'a self,
///         calendar: &'a Calendar,
///         window: Interval,
///     ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
///         Box::pin(async move {
///             // GET /me/calendars/{remote_id}/calendarView?startDateTime=..&endDateTime=..
///             Ok(events)
///         })
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// Returns the provider tag this adapter serves (e.g. "google").
    fn name(&self) -> &str;

    /// Fetches every event of `calendar` intersecting `window`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, expired credentials,
    /// malformed upstream payloads, etc.
    fn fetch_events<'a>(
        &'a self,
        calendar: &'a Calendar,
        window: Interval,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>>;

    /// Overrides the engine's per-fetch timeout for this adapter.
    ///
    /// `None` (the default) uses the engine's configured timeout.
    fn fetch_timeout(&self) -> Option<Duration> {
        None
    }
}

/// A provider serving fixed events from memory.
///
/// Events are keyed by [`Calendar::remote_id`]. Unknown calendars yield
/// [`ProviderError::not_found`].
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    name: String,
    calendars: HashMap<String, Vec<CalendarEvent>>,
}

impl MemoryProvider {
    /// Creates an empty provider answering to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calendars: HashMap::new(),
        }
    }

    /// Builder method to add events for a remote calendar id.
    pub fn with_events(
        mut self,
        remote_id: impl Into<String>,
        events: impl IntoIterator<Item = CalendarEvent>,
    ) -> Self {
        self.calendars
            .entry(remote_id.into())
            .or_default()
            .extend(events);
        self
    }
}

impl CalendarProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        calendar: &'a Calendar,
        window: Interval,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            let events = self.calendars.get(&calendar.remote_id).ok_or_else(|| {
                ProviderError::not_found(format!("calendar {} not found", calendar.remote_id))
                    .with_provider(&self.name)
            })?;

            Ok(events
                .iter()
                .filter(|event| event.overlaps(&window))
                .cloned()
                .collect())
        })
    }
}

/// A provider whose every fetch fails the same way.
///
/// Registered in place of an adapter that could not be set up, e.g.
/// because its client secrets are missing, so calendars using it are
/// reported as failing instead of unregistered.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    name: String,
    code: ProviderErrorCode,
    reason: String,
}

impl FailingProvider {
    /// Creates a provider failing with the code and message of `error`.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            code: error.code(),
            reason: error.message().to_string(),
        }
    }
}

impl CalendarProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        _calendar: &'a Calendar,
        _window: Interval,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        let error = ProviderError::new(self.code, self.reason.as_str()).with_provider(&self.name);
        Box::pin(std::future::ready(Err(error)))
    }
}
