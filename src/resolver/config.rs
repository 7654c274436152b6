//! Configuration for the resolution engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::resolver::error::{ResolverError, ResolverResult};
use crate::resolver::source::SourceLocator;

/// Default freshness window, in hours.
pub const DEFAULT_FRESHNESS_HOURS: u64 = 24;

/// Configuration for the resolution engine.
///
/// The serialized form matches the persisted configuration record:
/// `{ "sourceLocator": ..., "freshnessWindowHours": ... }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Dataset source URL. `None` or empty means the bundled dataset.
    #[serde(rename = "sourceLocator")]
    pub source_url: Option<String>,
    /// Maximum age before a cached snapshot must be refetched.
    #[serde(rename = "freshnessWindowHours", with = "hours_serde")]
    pub freshness_window: Duration,
    /// Request timeout for remote fetches.
    #[serde(skip)]
    pub request_timeout: Duration,
    /// Connection timeout for remote fetches.
    #[serde(skip)]
    pub connect_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            freshness_window: Duration::from_secs(DEFAULT_FRESHNESS_HOURS * 3600),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ResolverConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset source URL.
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the freshness window.
    #[must_use]
    pub const fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolve the configured dataset locator.
    ///
    /// # Errors
    /// Returns an error if the configured URL does not parse.
    pub fn locator(&self) -> ResolverResult<SourceLocator> {
        match self.source_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Ok(SourceLocator::Remote(Url::parse(raw)?)),
            _ => Ok(SourceLocator::Bundled),
        }
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ResolverResult<()> {
        if self.freshness_window.is_zero() {
            return Err(ResolverError::InvalidConfig(
                "freshness_window must be > 0".to_string(),
            ));
        }
        self.locator().map(|_| ())
    }
}

/// Serde module for whole-hour duration fields.
mod hours_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_secs() / 3600).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hours = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(hours * 3600))
    }
}
