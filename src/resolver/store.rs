//! Index store: snapshot freshness, refresh, and invalidation.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::resolver::cache::{CacheEntry, SnapshotCache};
use crate::resolver::config::ResolverConfig;
use crate::resolver::error::ResolverResult;
use crate::resolver::source::DataSource;
use crate::resolver::types::IndexSnapshot;

/// Owns the cached dataset snapshot and its refresh lifecycle.
pub struct IndexStore {
    config: ResolverConfig,
    source: Arc<dyn DataSource>,
    cache: Arc<dyn SnapshotCache>,
    refresh_lock: Mutex<()>,
}

impl IndexStore {
    /// Create a store over the given source and cache.
    #[must_use]
    pub fn new(
        config: ResolverConfig,
        source: Arc<dyn DataSource>,
        cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        Self {
            config,
            source,
            cache,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Return a snapshot strictly younger than the freshness window,
    /// fetching a new one when needed.
    ///
    /// Concurrent callers share one in-flight refresh: the refresh lock
    /// admits a single fetch, and waiters re-check the cache after
    /// acquiring it instead of fetching again.
    ///
    /// # Errors
    /// Returns an error if the fetch or parse fails; the previously
    /// cached entry, if any, is left untouched.
    pub async fn ensure_fresh(&self) -> ResolverResult<Arc<IndexSnapshot>> {
        if let Some(snapshot) = self.fresh_snapshot().await? {
            return Ok(snapshot);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(snapshot) = self.fresh_snapshot().await? {
            debug!("joined a refresh completed by a concurrent caller");
            return Ok(snapshot);
        }

        let locator = self.config.locator()?;
        let payload = self.source.fetch(locator).await?;
        let snapshot = Arc::new(IndexSnapshot::parse(&payload)?);
        self.cache
            .store(CacheEntry::new(Arc::clone(&snapshot), Utc::now()))
            .await?;
        info!(entries = snapshot.len(), "sponsorship index refreshed");
        Ok(snapshot)
    }

    /// Return the cached snapshot regardless of age, if one exists.
    pub async fn cached_snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        match self.cache.load().await {
            Ok(entry) => entry.map(|entry| entry.snapshot),
            Err(err) => {
                warn!("snapshot cache unreadable: {err}");
                None
            }
        }
    }

    /// Delete the cached entry without refetching. The next
    /// `ensure_fresh` fetches unconditionally.
    ///
    /// # Errors
    /// Returns an error if the cache backend fails.
    pub async fn invalidate(&self) -> ResolverResult<()> {
        self.cache.clear().await
    }

    async fn fresh_snapshot(&self) -> ResolverResult<Option<Arc<IndexSnapshot>>> {
        let entry = self.cache.load().await?;
        let now = Utc::now();
        Ok(entry.and_then(|entry| {
            if entry.is_fresh(self.config.freshness_window, now) {
                debug!("serving cached sponsorship index");
                Some(entry.snapshot)
            } else {
                None
            }
        }))
    }
}
