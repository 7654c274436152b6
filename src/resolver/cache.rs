//! Snapshot cache storage for the resolution engine.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::resolver::error::{ResolverError, ResolverResult};
use crate::resolver::types::IndexSnapshot;

/// Boxed future type for cache operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Storage key the cached snapshot lives under.
const SNAPSHOT_KEY: &str = "sponsor_index";

/// A cached snapshot together with its capture timestamp.
///
/// The persisted form is `{ "snapshot": ..., "timestamp": <epoch ms> }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Snapshot captured by the last successful fetch.
    pub snapshot: Arc<IndexSnapshot>,
    /// Instant the snapshot was fetched.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Wrap a snapshot with its capture time.
    #[must_use]
    pub fn new(snapshot: Arc<IndexSnapshot>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            fetched_at,
        }
    }

    /// Whether the entry is strictly younger than the freshness window.
    /// An entry aged exactly the window is stale.
    #[must_use]
    pub fn is_fresh(&self, window: Duration, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - self.fetched_at.timestamp_millis();
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        age_ms < window_ms
    }
}

/// Snapshot cache abstraction: keyed blob storage supplied by the host.
///
/// Implementations must replace entries atomically; a reader never
/// observes a half-written entry.
pub trait SnapshotCache: Send + Sync {
    /// Load the current cache entry, if any.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn load(&self) -> CacheFuture<'_, ResolverResult<Option<CacheEntry>>>;
    /// Replace the current cache entry wholesale.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn store(&self, entry: CacheEntry) -> CacheFuture<'_, ResolverResult<()>>;
    /// Delete the current cache entry. Clearing an empty cache is a
    /// no-op.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn clear(&self) -> CacheFuture<'_, ResolverResult<()>>;
}

/// In-memory snapshot cache, the default backend.
#[derive(Default)]
pub struct MemorySnapshotCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemorySnapshotCache {
    /// Create an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl SnapshotCache for MemorySnapshotCache {
    fn load(&self) -> CacheFuture<'_, ResolverResult<Option<CacheEntry>>> {
        Box::pin(async move {
            Ok(self
                .entries
                .get(SNAPSHOT_KEY)
                .map(|entry| entry.value().clone()))
        })
    }

    fn store(&self, entry: CacheEntry) -> CacheFuture<'_, ResolverResult<()>> {
        Box::pin(async move {
            self.entries.insert(SNAPSHOT_KEY.to_string(), entry);
            Ok(())
        })
    }

    fn clear(&self) -> CacheFuture<'_, ResolverResult<()>> {
        Box::pin(async move {
            self.entries.remove(SNAPSHOT_KEY);
            Ok(())
        })
    }
}

/// File-backed snapshot cache persisted as one JSON document, for hosts
/// that keep the index across restarts.
pub struct FileSnapshotCache {
    path: PathBuf,
}

impl FileSnapshotCache {
    /// Create a cache backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotCache for FileSnapshotCache {
    fn load(&self) -> CacheFuture<'_, ResolverResult<Option<CacheEntry>>> {
        Box::pin(async move {
            let payload = match tokio::fs::read_to_string(&self.path).await {
                Ok(payload) => payload,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(ResolverError::Io(err)),
            };
            let entry: CacheEntry = serde_json::from_str(&payload)
                .map_err(|e| ResolverError::Cache(format!("unreadable cache file: {e}")))?;
            Ok(Some(entry))
        })
    }

    fn store(&self, entry: CacheEntry) -> CacheFuture<'_, ResolverResult<()>> {
        Box::pin(async move {
            let payload = serde_json::to_string(&entry)?;
            // Write-then-rename keeps the replace atomic for readers.
            let staging = self.path.with_extension("tmp");
            tokio::fs::write(&staging, payload).await?;
            tokio::fs::rename(&staging, &self.path).await?;
            Ok(())
        })
    }

    fn clear(&self) -> CacheFuture<'_, ResolverResult<()>> {
        Box::pin(async move {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(ResolverError::Io(err)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::types::SponsorshipRecord;

    fn sample_entry(fetched_at: DateTime<Utc>) -> CacheEntry {
        let snapshot = IndexSnapshot::from_entries([(
            "ACME".to_string(),
            SponsorshipRecord {
                company: Some("Acme, Inc.".to_string()),
                roles: vec!["Engineer".to_string()],
            },
        )]);
        CacheEntry::new(Arc::new(snapshot), fetched_at)
    }

    #[test]
    fn test_freshness_boundary_is_strict() {
        let window = Duration::from_secs(24 * 3600);
        let now = Utc::now();
        let entry = sample_entry(now - chrono::Duration::hours(24));
        assert!(!entry.is_fresh(window, now));

        let entry = sample_entry(now - chrono::Duration::hours(24) + chrono::Duration::milliseconds(1));
        assert!(entry.is_fresh(window, now));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let window = Duration::from_secs(3600);
        let now = Utc::now();
        let entry = sample_entry(now + chrono::Duration::minutes(5));
        assert!(entry.is_fresh(window, now));
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemorySnapshotCache::new();
        assert!(matches!(cache.load().await, Ok(None)));

        let stored = cache.store(sample_entry(Utc::now())).await;
        assert!(stored.is_ok());

        let loaded = cache.load().await.unwrap_or_default();
        assert!(loaded.is_some());
        assert_eq!(loaded.map(|entry| entry.snapshot.len()), Some(1));

        assert!(cache.clear().await.is_ok());
        assert!(matches!(cache.load().await, Ok(None)));
        // Clearing again is a no-op.
        assert!(cache.clear().await.is_ok());
    }

    #[tokio::test]
    async fn test_file_cache_round_trip() {
        let Ok(dir) = tempfile::tempdir() else { return };
        let cache = FileSnapshotCache::new(dir.path().join("index.json"));
        assert!(matches!(cache.load().await, Ok(None)));

        let stored = cache.store(sample_entry(Utc::now())).await;
        assert!(stored.is_ok());

        let loaded = cache.load().await.unwrap_or_default();
        assert!(loaded.map(|entry| entry.snapshot.get("ACME").is_some()).unwrap_or_default());

        assert!(cache.clear().await.is_ok());
        assert!(matches!(cache.load().await, Ok(None)));
        assert!(cache.clear().await.is_ok());
    }

    #[tokio::test]
    async fn test_file_cache_persisted_layout() {
        let Ok(dir) = tempfile::tempdir() else { return };
        let path = dir.path().join("index.json");
        let cache = FileSnapshotCache::new(path.clone());
        let fetched_at = Utc::now();
        assert!(cache.store(sample_entry(fetched_at)).await.is_ok());

        let raw = tokio::fs::read_to_string(&path).await.unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap_or_default();
        assert_eq!(value["timestamp"], fetched_at.timestamp_millis());
        assert!(value["snapshot"]["ACME"].is_object());
    }
}
