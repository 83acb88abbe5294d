//! Availability hint computation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dadle_core::{
    AvailabilityHint, PollOption, ValidationResult, normalize_options, query_window,
    resolve_overlaps,
};
use dadle_providers::{Calendar, ProviderRegistry};
use tracing::{debug, info};

use crate::aggregator::{CalendarFailure, EventAggregator};
use crate::config::HintConfig;
use crate::health::{CalendarHealth, check_calendar_health};

/// Hints for one poll together with the calendars that could not be read.
#[derive(Debug, Default)]
pub struct HintReport {
    /// One hint per Date/DateTime option, in option order.
    pub hints: Vec<AvailabilityHint>,
    /// Calendars that contributed no events because their fetch failed.
    pub failures: Vec<CalendarFailure>,
}

impl HintReport {
    /// Returns true if every enabled calendar could be read.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes availability hints against a fixed set of providers.
#[derive(Debug, Clone)]
pub struct HintEngine {
    registry: Arc<ProviderRegistry>,
    config: HintConfig,
}

impl HintEngine {
    pub fn new(registry: Arc<ProviderRegistry>, config: HintConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    /// Computes the hints for `options`, interpreted in `timezone`, against
    /// the enabled calendars among `calendars`.
    ///
    /// Arbitrary options are skipped. Calendars are only queried when there
    /// is at least one Date/DateTime option.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](dadle_core::ValidationError) if an
    /// option is malformed or the timezone is unknown. Provider failures
    /// never fail the computation; they are listed in
    /// [`HintReport::failures`].
    pub async fn compute(
        &self,
        options: &[PollOption],
        timezone: &str,
        calendars: &[Calendar],
    ) -> ValidationResult<HintReport> {
        compute_report(&self.registry, &self.config, options, timezone, calendars).await
    }

    /// Like [`compute`](Self::compute), discarding failure details.
    pub async fn compute_hints(
        &self,
        options: &[PollOption],
        timezone: &str,
        calendars: &[Calendar],
    ) -> ValidationResult<Vec<AvailabilityHint>> {
        Ok(self.compute(options, timezone, calendars).await?.hints)
    }

    /// Probes whether `calendar` can currently be read.
    pub async fn check_health(&self, calendar: &Calendar, now: DateTime<Utc>) -> CalendarHealth {
        check_calendar_health(&self.registry, calendar, now, &self.config).await
    }
}

/// Computes availability hints with the default configuration.
///
/// See [`HintEngine::compute`].
pub async fn compute_availability_hints(
    registry: &ProviderRegistry,
    options: &[PollOption],
    timezone: &str,
    calendars: &[Calendar],
) -> ValidationResult<Vec<AvailabilityHint>> {
    let report =
        compute_report(registry, &HintConfig::default(), options, timezone, calendars).await?;
    Ok(report.hints)
}

async fn compute_report(
    registry: &ProviderRegistry,
    config: &HintConfig,
    options: &[PollOption],
    timezone: &str,
    calendars: &[Calendar],
) -> ValidationResult<HintReport> {
    let intervals = normalize_options(options, timezone)?;
    let Some(window) = query_window(&intervals) else {
        debug!(options = options.len(), "No timed options; skipping calendars");
        return Ok(HintReport::default());
    };

    let aggregation = EventAggregator::new(registry, config.fetch_timeout())
        .collect(calendars, window)
        .await;

    let hints = resolve_overlaps(&intervals, &aggregation.events);
    info!(
        timezone,
        options = intervals.len(),
        calendars = aggregation.calendars_queried,
        events = aggregation.events.len(),
        conflicting_options = hints.iter().filter(|h| h.has_conflicts()).count(),
        failed_calendars = aggregation.failures.len(),
        "Computed availability hints"
    );

    Ok(HintReport {
        hints,
        failures: aggregation.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDateTime;
    use dadle_core::{
        CalendarEvent, EventStatus, Interval, ValidationError, YesNoMaybe, civil_to_utc,
        parse_civil, parse_timezone,
    };
    use dadle_providers::{
        BoxFuture, CalendarProvider, FailingProvider, MemoryProvider, ProviderError,
        ProviderErrorCode, ProviderResult,
    };

    const BERLIN: &str = "Europe/Berlin";

    fn civil(text: &str) -> NaiveDateTime {
        parse_civil("test", text).unwrap()
    }

    /// Berlin wall-clock time as an instant.
    fn berlin(text: &str) -> DateTime<Utc> {
        civil_to_utc(&parse_timezone(BERLIN).unwrap(), civil(text)).unwrap()
    }

    fn event(title: &str, from: &str, to: &str, status: EventStatus) -> CalendarEvent {
        CalendarEvent::new(title, berlin(from), berlin(to), status)
    }

    fn morning_option() -> PollOption {
        PollOption::date_time("o1", civil("2021-11-04T10:00"), civil("2021-11-04T13:00"))
    }

    fn engine(provider: MemoryProvider) -> HintEngine {
        let registry = ProviderRegistry::new()
            .with_provider("google", "Google", Arc::new(provider))
            .unwrap()
            .with_provider(
                "microsoft",
                "Microsoft 365",
                Arc::new(FailingProvider::new(
                    "microsoft",
                    ProviderError::network("connection reset"),
                )),
            )
            .unwrap();
        HintEngine::new(Arc::new(registry), HintConfig::default())
    }

    /// Counts fetches so tests can assert that no calendar was queried.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CalendarProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch_events<'a>(
            &'a self,
            _calendar: &'a Calendar,
            _window: Interval,
        ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[tokio::test]
    async fn event_overlapping_option_start_is_hinted() {
        let standup = event(
            "Standup",
            "2021-11-04T09:00",
            "2021-11-04T10:30",
            EventStatus::Confirmed,
        );
        let engine = engine(MemoryProvider::new("google").with_events("work", [standup.clone()]));
        let calendars = [Calendar::new("c1", "google", "work")];

        let hints = engine
            .compute_hints(&[morning_option()], BERLIN, &calendars)
            .await
            .unwrap();

        assert_eq!(hints, [AvailabilityHint::new("o1", vec![standup])]);
        assert_eq!(hints[0].suggestion(), YesNoMaybe::No);
    }

    #[tokio::test]
    async fn event_ending_at_option_start_is_not_hinted() {
        let engine = engine(MemoryProvider::new("google").with_events(
            "work",
            [event(
                "Breakfast",
                "2021-11-04T08:00",
                "2021-11-04T10:00",
                EventStatus::Confirmed,
            )],
        ));
        let calendars = [Calendar::new("c1", "google", "work")];

        let hints = engine
            .compute_hints(&[morning_option()], BERLIN, &calendars)
            .await
            .unwrap();

        assert_eq!(hints.len(), 1);
        assert!(hints[0].overlapping_events.is_empty());
        assert_eq!(hints[0].suggestion(), YesNoMaybe::Yes);
    }

    #[tokio::test]
    async fn arbitrary_options_are_omitted() {
        let engine = engine(MemoryProvider::new("google").with_events("work", Vec::<CalendarEvent>::new()));
        let calendars = [Calendar::new("c1", "google", "work")];
        let options = [
            PollOption::arbitrary("a1", "Pizza"),
            morning_option(),
            PollOption::arbitrary("a2", "Sushi"),
            PollOption::parse_date("o2", "2021-11-08").unwrap(),
        ];

        let hints = engine.compute_hints(&options, BERLIN, &calendars).await.unwrap();

        let ids: Vec<_> = hints.iter().map(|h| h.option_id.as_str()).collect();
        assert_eq!(ids, ["o1", "o2"]);
    }

    #[tokio::test]
    async fn only_arbitrary_options_skip_calendars() {
        let counting = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let registry = ProviderRegistry::new()
            .with_provider("counting", "Counting", counting.clone())
            .unwrap();
        let engine = HintEngine::new(Arc::new(registry), HintConfig::default());
        let calendars = [Calendar::new("c1", "counting", "x")];

        let report = engine
            .compute(&[PollOption::arbitrary("a1", "Pizza")], "Not/AZone", &calendars)
            .await
            .unwrap();

        assert!(report.hints.is_empty());
        assert!(report.is_complete());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_calendar_degrades_gracefully() {
        let lunch = event(
            "Lunch",
            "2021-11-04T12:00",
            "2021-11-04T13:30",
            EventStatus::Tentative,
        );
        let engine = engine(MemoryProvider::new("google").with_events("work", [lunch.clone()]));
        let calendars = [
            Calendar::new("c-ms", "microsoft", "AAMk"),
            Calendar::new("c-google", "google", "work"),
        ];

        let report = engine
            .compute(&[morning_option()], BERLIN, &calendars)
            .await
            .unwrap();

        assert_eq!(report.hints, [AvailabilityHint::new("o1", vec![lunch])]);
        assert_eq!(report.hints[0].suggestion(), YesNoMaybe::Maybe);
        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].calendar_id, "c-ms");
        assert_eq!(report.failures[0].error.code(), ProviderErrorCode::NetworkError);
    }

    #[tokio::test]
    async fn no_enabled_calendars_yields_empty_hints() {
        let engine = engine(MemoryProvider::new("google").with_events(
            "work",
            [event(
                "Standup",
                "2021-11-04T09:00",
                "2021-11-04T10:30",
                EventStatus::Confirmed,
            )],
        ));
        let calendars = [Calendar::new("c1", "google", "work").with_enabled(false)];
        let options = [
            morning_option(),
            PollOption::parse_date("o2", "2021-11-08").unwrap(),
        ];

        let hints = engine.compute_hints(&options, BERLIN, &calendars).await.unwrap();

        assert_eq!(
            hints,
            [
                AvailabilityHint::new("o1", Vec::new()),
                AvailabilityHint::new("o2", Vec::new()),
            ]
        );
    }

    #[tokio::test]
    async fn all_day_option_collects_the_whole_day() {
        let engine = engine(MemoryProvider::new("google").with_events(
            "work",
            [
                event("Late", "2021-11-07T22:00", "2021-11-08T00:30", EventStatus::Free),
                event("Next day", "2021-11-09T00:00", "2021-11-09T01:00", EventStatus::Confirmed),
            ],
        ));
        let calendars = [Calendar::new("c1", "google", "work")];
        let options = [PollOption::parse_date("o1", "2021-11-08").unwrap()];

        let hints = engine.compute_hints(&options, BERLIN, &calendars).await.unwrap();

        let titles: Vec<_> = hints[0]
            .overlapping_events
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["Late"]);
        assert_eq!(hints[0].suggestion(), YesNoMaybe::Yes);
    }

    #[tokio::test]
    async fn validation_errors_surface() {
        let engine = engine(MemoryProvider::new("google"));
        let calendars = [Calendar::new("c1", "google", "work")];

        let err = engine
            .compute(&[morning_option()], "Mars/Olympus", &calendars)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownTimezone {
                timezone: "Mars/Olympus".into()
            }
        );

        let inverted =
            PollOption::date_time("o9", civil("2021-11-04T13:00"), civil("2021-11-04T10:00"));
        let err = engine
            .compute(&[inverted], BERLIN, &calendars)
            .await
            .unwrap_err();
        assert_eq!(err.option_id(), Some("o9"));
    }

    #[tokio::test]
    async fn free_function_matches_engine() {
        let standup = event(
            "Standup",
            "2021-11-04T09:00",
            "2021-11-04T10:30",
            EventStatus::Confirmed,
        );
        let registry = Arc::new(
            ProviderRegistry::new()
                .with_provider(
                    "google",
                    "Google",
                    Arc::new(MemoryProvider::new("google").with_events("work", [standup.clone()])),
                )
                .unwrap(),
        );
        let calendars = [
            Calendar::new("c1", "google", "work"),
            Calendar::new("c2", "caldav", "home"),
        ];

        let engine = HintEngine::new(registry.clone(), HintConfig::default());

        let hints = compute_availability_hints(&registry, &[morning_option()], BERLIN, &calendars)
            .await
            .unwrap();

        assert_eq!(hints, [AvailabilityHint::new("o1", vec![standup])]);
        assert_eq!(
            hints,
            engine
                .compute_hints(&[morning_option()], BERLIN, &calendars)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn free_function_skips_calendars_without_timed_options() {
        let counting = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let registry = ProviderRegistry::new()
            .with_provider("counting", "Counting", counting.clone())
            .unwrap();
        let calendars = [Calendar::new("c1", "counting", "x")];

        let hints = compute_availability_hints(
            &registry,
            &[PollOption::arbitrary("a1", "Pizza")],
            "Not/AZone",
            &calendars,
        )
        .await
        .unwrap();
        assert!(hints.is_empty());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

        let err = compute_availability_hints(&registry, &[morning_option()], "Not/AZone", &calendars)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownTimezone {
                timezone: "Not/AZone".into()
            }
        );
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }
}
