//! Calendars linked to a user account.
//!
//! A [`Calendar`] is a read-only snapshot of the link record owned by the
//! user store. The hint engine never mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-specific secrets for one linked calendar.
///
/// `Debug` output is redacted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Long-lived OAuth refresh token issued by the provider.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Creates credentials holding a refresh token.
    pub fn refresh_token(token: impl Into<String>) -> Self {
        Self {
            refresh_token: Some(token.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A calendar the user linked from an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Identifier of the link record.
    pub id: String,
    /// Provider tag, e.g. `google` or `microsoft`.
    pub provider: String,
    /// Only enabled calendars contribute events to hints.
    pub enabled: bool,
    /// Display name of the calendar.
    #[serde(default)]
    pub friendly_name: String,
    /// The account name at the provider.
    #[serde(default)]
    pub username_at_provider: String,
    /// Identifier of the calendar at the provider.
    #[serde(default)]
    pub remote_id: String,
    #[serde(default, skip_serializing)]
    pub credentials: Credentials,
}

impl Calendar {
    /// Creates an enabled calendar.
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        remote_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            enabled: true,
            friendly_name: String::new(),
            username_at_provider: String::new(),
            remote_id: remote_id.into(),
            credentials: Credentials::default(),
        }
    }

    /// Builder method to enable or disable the calendar.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the display name.
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    /// Builder method to set the provider account name.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username_at_provider = username.into();
        self
    }

    /// Builder method to set credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns the calendars that take part in a computation.
    ///
    /// With `only_enabled`, disabled calendars are skipped.
    pub fn participating(calendars: &[Calendar], only_enabled: bool) -> Vec<&Calendar> {
        calendars
            .iter()
            .filter(|c| c.enabled || !only_enabled)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let cal = Calendar::new("c1", "google", "primary")
            .with_friendly_name("Work")
            .with_username("ada@example.com")
            .with_credentials(Credentials::refresh_token("1//secret"));

        assert!(cal.enabled);
        assert_eq!(cal.provider, "google");
        assert_eq!(cal.remote_id, "primary");
        assert_eq!(cal.friendly_name, "Work");
        assert_eq!(cal.credentials.refresh_token.as_deref(), Some("1//secret"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cal = Calendar::new("c1", "google", "primary")
            .with_credentials(Credentials::refresh_token("1//secret"));
        let debug = format!("{:?}", cal);
        assert!(!debug.contains("1//secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn serialization_skips_credentials() {
        let cal = Calendar::new("c1", "microsoft", "AAMk")
            .with_credentials(Credentials::refresh_token("1//secret"));
        let json = serde_json::to_string(&cal).unwrap();
        assert!(!json.contains("secret"));

        let parsed: Calendar = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.credentials, Credentials::default());
        assert_eq!(parsed.remote_id, "AAMk");
    }

    #[test]
    fn participating_filters_disabled() {
        let calendars = vec![
            Calendar::new("a", "google", "x"),
            Calendar::new("b", "google", "y").with_enabled(false),
            Calendar::new("c", "microsoft", "z"),
        ];

        let enabled: Vec<_> = Calendar::participating(&calendars, true)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(enabled, ["a", "c"]);
        assert_eq!(Calendar::participating(&calendars, false).len(), 3);
    }
}
