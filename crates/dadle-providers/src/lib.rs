//! Calendar provider adapters and their registry.
//!
//! A calendar link names its provider by tag (`google`, `microsoft`, ...).
//! The [`ProviderRegistry`] maps that tag to a [`CalendarProvider`], which
//! fetches the calendar's events for a time window:
//!
//! ```text
//! Calendar { provider: "google", remote_id, credentials }
//!     │
//!     ├── ProviderRegistry::resolve ──▶ Arc<dyn CalendarProvider>
//!     │
//!     └── fetch_events(calendar, window) ──▶ Vec<CalendarEvent> | ProviderError
//! ```
//!
//! Network adapters live with the host application. This crate ships the
//! trait, the registry, and two adapters for tests and degraded startup
//! ([`MemoryProvider`], [`FailingProvider`]).

pub mod calendar;
pub mod error;
pub mod provider;
pub mod registry;

pub use calendar::{Calendar, Credentials};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult, RegistryError};
pub use provider::{BoxFuture, CalendarProvider, FailingProvider, MemoryProvider};
pub use registry::ProviderRegistry;
