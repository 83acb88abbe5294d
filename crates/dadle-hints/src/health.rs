//! Calendar health probe.
//!
//! Used when a calendar is linked or its settings are shown, to tell the
//! user whether the link still works.

use chrono::{DateTime, Utc};
use dadle_core::Interval;
use dadle_providers::{Calendar, ProviderRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::EventAggregator;
use crate::config::HintConfig;

/// Outcome of probing one calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHealth {
    pub calendar_id: String,
    pub healthy: bool,
    /// Why the probe failed, when it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probes `calendar` by fetching its events for the configured horizon
/// starting at `now`.
///
/// Failures are reported in the result, never returned as errors. The
/// calendar is probed even when it is disabled.
pub async fn check_calendar_health(
    registry: &ProviderRegistry,
    calendar: &Calendar,
    now: DateTime<Utc>,
    config: &HintConfig,
) -> CalendarHealth {
    let window = Interval::from_duration(now, config.health_check_horizon());
    let outcome = EventAggregator::new(registry, config.fetch_timeout())
        .fetch(calendar, window)
        .await;

    match outcome {
        Ok(events) => {
            debug!(
                calendar = %calendar.id,
                provider = %calendar.provider,
                event_count = events.len(),
                "Calendar is healthy"
            );
            CalendarHealth {
                calendar_id: calendar.id.clone(),
                healthy: true,
                error: None,
            }
        }
        Err(error) => {
            info!(
                calendar = %calendar.id,
                provider = %calendar.provider,
                error = %error,
                "Calendar health check failed"
            );
            CalendarHealth {
                calendar_id: calendar.id.clone(),
                healthy: false,
                error: Some(error.to_string()),
            }
        }
    }
}
