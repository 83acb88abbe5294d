//! Calendar fetch errors.
//!
//! Every adapter reports failures as a [`ProviderError`]. The hint engine
//! only looks at the [`ProviderErrorCode`] for logging; the message is for
//! humans.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Why a calendar could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The refresh token was revoked or has expired; the user must relink.
    AuthenticationFailed,
    /// The account may no longer read this calendar.
    AuthorizationFailed,
    NetworkError,
    RateLimited,
    /// 5xx from the calendar API.
    ServerError,
    /// The calendar API answered with something unparsable.
    InvalidResponse,
    /// The calendar was deleted at the provider.
    NotFound,
    Timeout,
    /// The calendar's provider tag has no adapter.
    ProviderNotRegistered,
    /// The adapter lacks its client id or secret.
    ConfigurationError,
    InternalError,
}

impl ProviderErrorCode {
    /// Maps an HTTP status from a calendar API to a code.
    ///
    /// Returns `None` for success statuses.
    pub fn from_http_status(status: u16) -> Option<Self> {
        let code = match status {
            100..=399 => return None,
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 | 410 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::InvalidResponse,
        };
        Some(code)
    }

    /// Returns true if a later attempt could plausibly succeed.
    ///
    /// The hint engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError | Self::Timeout
        )
    }

    /// Returns true if the user has to relink the calendar to fix this.
    pub fn needs_relink(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::AuthorizationFailed | Self::NotFound
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::ProviderNotRegistered => "provider_not_registered",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed calendar fetch.
///
/// Displays as `[provider] code: message` when the provider tag is known.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Builds the error for a non-success HTTP response of a calendar API.
    ///
    /// Success statuses yield an `InternalError`, since the caller should
    /// not have treated them as failures.
    pub fn http(status: u16, body: &str) -> Self {
        let code = ProviderErrorCode::from_http_status(status)
            .unwrap_or(ProviderErrorCode::InternalError);
        let body = body.trim();
        if body.is_empty() {
            Self::new(code, format!("HTTP {status}"))
        } else {
            Self::new(code, format!("HTTP {status}: {body}"))
        }
    }

    /// A fetch that did not settle within `after`.
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ProviderErrorCode::Timeout,
            format!("fetch did not complete within {}s", after.as_secs_f64()),
        )
    }

    /// A calendar whose provider tag has no registered adapter.
    pub fn not_registered(tag: &str) -> Self {
        Self::new(
            ProviderErrorCode::ProviderNotRegistered,
            format!("no calendar provider registered for `{tag}`"),
        )
        .with_provider(tag)
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attaches the underlying client error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The provider tag, if known.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "[{provider}] {}: {}", self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while assembling a [`ProviderRegistry`](crate::ProviderRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("provider `{tag}` has already been registered")]
    AlreadyRegistered { tag: String },
}
