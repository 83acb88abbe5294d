//! Maps provider tags to adapter instances.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::calendar::Calendar;
use crate::error::{ProviderError, ProviderResult, RegistryError};
use crate::provider::CalendarProvider;

struct Registered {
    friendly_name: String,
    provider: Arc<dyn CalendarProvider>,
}

/// Registry of calendar adapters keyed by provider tag.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Registered>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under `tag`.
    ///
    /// # Errors
    ///
    /// Fails if `tag` is already registered; the existing adapter is kept.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        friendly_name: impl Into<String>,
        provider: Arc<dyn CalendarProvider>,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.providers.contains_key(&tag) {
            return Err(RegistryError::AlreadyRegistered { tag });
        }
        debug!(provider = %tag, adapter = provider.name(), "Registered calendar provider");
        self.providers.insert(
            tag,
            Registered {
                friendly_name: friendly_name.into(),
                provider,
            },
        );
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_provider(
        mut self,
        tag: impl Into<String>,
        friendly_name: impl Into<String>,
        provider: Arc<dyn CalendarProvider>,
    ) -> Result<Self, RegistryError> {
        self.register(tag, friendly_name, provider)?;
        Ok(self)
    }

    /// Returns the adapter registered under `tag`.
    pub fn get(&self, tag: &str) -> Option<Arc<dyn CalendarProvider>> {
        self.providers.get(tag).map(|r| Arc::clone(&r.provider))
    }

    /// Returns the adapter serving `calendar`.
    ///
    /// # Errors
    ///
    /// Returns a `ProviderNotRegistered` error if nothing serves the
    /// calendar's provider tag.
    pub fn resolve(&self, calendar: &Calendar) -> ProviderResult<Arc<dyn CalendarProvider>> {
        self.get(&calendar.provider)
            .ok_or_else(|| ProviderError::not_registered(&calendar.provider))
    }

    /// Returns tag → friendly name for every registered adapter.
    pub fn available_providers(&self) -> BTreeMap<String, String> {
        self.providers
            .iter()
            .map(|(tag, r)| (tag.clone(), r.friendly_name.clone()))
            .collect()
    }

    /// Returns true if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.providers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_providers())
            .finish()
    }
}
