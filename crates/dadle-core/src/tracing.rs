//! Tracing setup for hosts embedding the hint engine.
//!
//! The engine itself only emits `tracing` events (provider failures at
//! `warn`, fetch results at `debug`, computation summaries at `info`). A
//! host process that has no subscriber of its own can install one here,
//! typically from the `[logging]` table of its config file:
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("unknown log level `{0}`")]
    Level(String),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingOutputFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line.
    Json,
}

/// How the host's global subscriber is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Level for `dadle` targets, e.g. `info`. Ignored when `RUST_LOG` or
    /// `filter` is set.
    pub level: String,
    pub format: TracingOutputFormat,
    /// Include file and line in each record.
    pub location: bool,
    /// Emit a record when a span opens and closes.
    pub span_events: bool,
    /// Full filter directive, e.g. `dadle_hints=trace,warn`. Takes
    /// precedence over `RUST_LOG`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: TracingOutputFormat::Pretty,
            location: false,
            span_events: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Verbose single-line output for local debugging.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            format: TracingOutputFormat::Compact,
            location: true,
            ..Self::default()
        }
    }

    /// JSON output for a request-serving process.
    #[must_use]
    pub fn service() -> Self {
        Self {
            format: TracingOutputFormat::Json,
            span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Parses [`level`](Self::level).
    pub fn parsed_level(&self) -> Result<Level, TracingError> {
        Level::from_str(&self.level).map_err(|_| TracingError::Level(self.level.clone()))
    }

    /// The directive used when neither `filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> Result<String, TracingError> {
        Ok(format!("dadle={}", self.parsed_level()?))
    }

    fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(filter) = &self.filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        let fallback = self.default_directive()?;
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
    }
}

/// Installs a global subscriber built from `config`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed or the level or
/// filter directive is invalid.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let env_filter = config.build_filter()?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let layer = fmt::layer()
        .with_file(config.location)
        .with_line_number(config.location)
        .with_span_events(span_events);
    let layer = match config.format {
        TracingOutputFormat::Pretty => layer.pretty().boxed(),
        TracingOutputFormat::Compact => layer.compact().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(env_filter).with(layer),
    )?;
    Ok(())
}
