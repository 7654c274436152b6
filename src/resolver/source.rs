//! Dataset sources for the resolution engine.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use crate::resolver::config::ResolverConfig;
use crate::resolver::error::{ResolverError, ResolverResult};

/// Dataset shipped with the crate, served when no source URL is
/// configured.
const BUNDLED_DATASET: &str = include_str!("../../data/sponsor_index.json");

/// Boxed future type for data source operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where the dataset is loaded from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceLocator {
    /// The dataset shipped with the crate.
    Bundled,
    /// A remote JSON document.
    Remote(Url),
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled dataset"),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Data source abstraction: fetch a raw dataset payload for a locator.
pub trait DataSource: Send + Sync {
    /// Fetch the raw dataset payload.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be retrieved.
    fn fetch(&self, locator: SourceLocator) -> SourceFuture<'_, ResolverResult<String>>;
}

/// HTTP-backed data source that also serves the bundled dataset.
pub struct HttpDataSource {
    client: reqwest::Client,
}

impl HttpDataSource {
    /// Build a source with a client tuned from the config.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ResolverConfig) -> ResolverResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ResolverError::SourceUnavailable(e.to_string()))?;

        Ok(Self { client })
    }
}

impl DataSource for HttpDataSource {
    fn fetch(&self, locator: SourceLocator) -> SourceFuture<'_, ResolverResult<String>> {
        Box::pin(async move {
            match locator {
                SourceLocator::Bundled => Ok(BUNDLED_DATASET.to_string()),
                SourceLocator::Remote(url) => {
                    tracing::debug!("fetching sponsorship index from {url}");
                    let response = self.client.get(url).send().await?.error_for_status()?;
                    Ok(response.text().await?)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::normalizer::NameNormalizer;
    use crate::resolver::types::IndexSnapshot;

    #[tokio::test]
    async fn test_bundled_dataset_parses() {
        let source = HttpDataSource::new(&ResolverConfig::default());
        assert!(source.is_ok());
        let Ok(source) = source else { return };

        let payload = source.fetch(SourceLocator::Bundled).await;
        assert!(payload.is_ok());
        let snapshot = IndexSnapshot::parse(payload.as_deref().unwrap_or_default());
        assert!(snapshot.map(|s| !s.is_empty()).unwrap_or_default());
    }

    #[test]
    fn test_bundled_keys_are_canonical() {
        let snapshot = IndexSnapshot::parse(BUNDLED_DATASET).unwrap_or_default();
        let normalizer = NameNormalizer::new().unwrap_or_else(|_| unreachable!("pattern is valid"));
        for (key, record) in snapshot.entries() {
            assert_eq!(normalizer.normalize(key), key, "key {key:?} is not canonical");
            if let Some(company) = &record.company {
                assert_eq!(
                    normalizer.normalize(company),
                    key,
                    "key {key:?} does not match its display name {company:?}"
                );
            }
        }
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(SourceLocator::Bundled.to_string(), "bundled dataset");
    }
}
