//! Company-name resolution engine.
//!
//! This module resolves free-form, noisy organization names against a
//! periodically refreshed sponsorship index:
//! - Deterministic name normalization
//! - Exact-then-prefix matching
//! - Snapshot caching with a freshness window and single-flight refresh
//! - Pluggable data source and cache backends

pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod source;
pub mod store;
pub mod types;

pub use cache::{CacheEntry, FileSnapshotCache, MemorySnapshotCache, SnapshotCache};
pub use config::ResolverConfig;
pub use error::{ErrorKind, ResolverError, ResolverResult};
pub use matcher::Matcher;
pub use normalizer::NameNormalizer;
pub use source::{DataSource, HttpDataSource, SourceLocator};
pub use store::IndexStore;
pub use types::{IndexSnapshot, LookupResponse, ResolvedMatch, SponsorshipRecord};

use std::sync::Arc;

use tracing::warn;

/// Backend dependencies for the resolver service.
pub struct ResolverBackends {
    /// Dataset source implementation.
    pub source: Arc<dyn DataSource>,
    /// Snapshot cache implementation.
    pub cache: Arc<dyn SnapshotCache>,
}

impl ResolverBackends {
    /// Build the default backends: HTTP/bundled source and an in-memory
    /// cache.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn bundled_http(config: &ResolverConfig) -> ResolverResult<Self> {
        Ok(Self {
            source: Arc::new(HttpDataSource::new(config)?),
            cache: Arc::new(MemorySnapshotCache::new()),
        })
    }
}

/// Facade resolving free-form company names to sponsorship records.
pub struct ResolverService {
    store: IndexStore,
    matcher: Matcher,
}

impl ResolverService {
    /// Create a service with default backends.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: ResolverConfig) -> ResolverResult<Self> {
        let backends = ResolverBackends::bundled_http(&config)?;
        Self::with_backends(config, backends)
    }

    /// Create a service over injected backends.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_backends(config: ResolverConfig, backends: ResolverBackends) -> ResolverResult<Self> {
        config.validate()?;
        let matcher = Matcher::new()?;
        let store = IndexStore::new(config, backends.source, backends.cache);
        Ok(Self { store, matcher })
    }

    /// Resolve a raw company name to a sponsorship record.
    ///
    /// Empty or whitespace-only names resolve to `None` without touching
    /// the index. When a refresh fails but an earlier snapshot is still
    /// cached, the stale snapshot serves the request; an error surfaces
    /// only when no snapshot of any age exists.
    ///
    /// # Errors
    /// Returns an error when the source fails and nothing is cached.
    pub async fn resolve(&self, company: &str) -> ResolverResult<Option<ResolvedMatch>> {
        if company.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = match self.store.ensure_fresh().await {
            Ok(snapshot) => snapshot,
            Err(err) => match self.store.cached_snapshot().await {
                Some(stale) => {
                    warn!("index refresh failed, serving stale snapshot: {err}");
                    stale
                }
                None => return Err(err),
            },
        };

        Ok(self.matcher.resolve(&snapshot, company))
    }

    /// Resolve a name into the transport-agnostic reply envelope.
    pub async fn lookup(&self, company: &str) -> LookupResponse {
        LookupResponse::from_outcome(self.resolve(company).await)
    }

    /// Drop the cached snapshot. Idempotent; the next resolution fetches
    /// unconditionally.
    ///
    /// # Errors
    /// Returns an error if the cache backend fails.
    pub async fn invalidate_cache(&self) -> ResolverResult<()> {
        self.store.invalidate().await
    }
}
