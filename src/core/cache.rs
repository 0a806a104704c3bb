use crate::domain::model::AllowedDomains;
use crate::domain::ports::{Clock, DocumentStore, SystemClock};
use crate::utils::error::{GateError, Result};
use std::sync::{Arc, PoisonError, RwLock};

/// Maximum age of a cached allow-list before it is read again.
pub const CACHE_TTL_MS: i64 = 60_000;

#[derive(Debug, Clone)]
struct CachedDomains {
    domains: Arc<AllowedDomains>,
    fetched_at: i64,
}

/// Time-based single-entry cache for the allow-list document.
///
/// Concurrent cold resolutions may each read the store; whichever finishes
/// last wins. The lock is never held across the store read.
pub struct DomainCache {
    clock: Arc<dyn Clock>,
    state: RwLock<Option<CachedDomains>>,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(None),
        }
    }

    /// Returns the allow-list, reading `path` from `store` when the cached
    /// copy is absent or older than [`CACHE_TTL_MS`].
    pub async fn resolve(
        &self,
        store: &dyn DocumentStore,
        path: &str,
    ) -> Result<Arc<AllowedDomains>> {
        let now = self.clock.now_millis();

        if let Some(cached) = self.fresh(now) {
            tracing::debug!("Using cached allow-list ({} domains)", cached.len());
            return Ok(cached);
        }

        tracing::debug!("Reading allow-list document: {}", path);
        let document = store.get_document(path).await?.ok_or_else(|| {
            tracing::error!("Allow-list document {} does not exist", path);
            GateError::InvalidDomainConfig
        })?;

        let domains = Arc::new(AllowedDomains::from_document(&document).inspect_err(|_| {
            tracing::error!("Allow-list document {} has an invalid `domains` field", path);
        })?);

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(CachedDomains {
            domains: Arc::clone(&domains),
            fetched_at: now,
        });

        tracing::info!("Refreshed allow-list: {} domains", domains.len());
        Ok(domains)
    }

    /// Currently cached allow-list, regardless of age.
    pub fn snapshot(&self) -> Option<Arc<AllowedDomains>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| Arc::clone(&cached.domains))
    }

    fn fresh(&self, now: i64) -> Option<Arc<AllowedDomains>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|cached| now - cached.fetched_at < CACHE_TTL_MS)
            .map(|cached| Arc::clone(&cached.domains))
    }
}

impl Default for DomainCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{ManualClock, MemoryDocumentStore};
    use serde_json::json;

    const PATH: &str = "config/emailDomains";

    fn setup() -> (Arc<ManualClock>, DomainCache, MemoryDocumentStore) {
        let clock = Arc::new(ManualClock::default());
        let cache = DomainCache::with_clock(clock.clone());
        let store = MemoryDocumentStore::new();
        store.insert(PATH, json!({"domains": ["university.edu"]}));
        (clock, cache, store)
    }

    #[tokio::test]
    async fn test_resolve_within_ttl_uses_cache() {
        let (clock, cache, store) = setup();

        let first = cache.resolve(&store, PATH).await.unwrap();
        clock.advance(CACHE_TTL_MS - 1);
        let second = cache.resolve(&store, PATH).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_resolve_after_ttl_rereads_document() {
        let (clock, cache, store) = setup();

        cache.resolve(&store, PATH).await.unwrap();
        store.insert(PATH, json!({"domains": ["college.edu"]}));
        clock.advance(CACHE_TTL_MS);
        let refreshed = cache.resolve(&store, PATH).await.unwrap();

        assert_eq!(store.reads(), 2);
        assert!(refreshed.contains("college.edu"));
        assert!(!refreshed.contains("university.edu"));
    }

    #[tokio::test]
    async fn test_stale_cache_ignores_document_changes_until_expiry() {
        let (clock, cache, store) = setup();

        cache.resolve(&store, PATH).await.unwrap();
        store.insert(PATH, json!({"domains": ["college.edu"]}));
        clock.advance(1_000);
        let cached = cache.resolve(&store, PATH).await.unwrap();

        assert!(cached.contains("university.edu"));
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_missing_document_fails_closed() {
        let clock = Arc::new(ManualClock::default());
        let cache = DomainCache::with_clock(clock);
        let store = MemoryDocumentStore::new();

        let err = cache.resolve(&store, PATH).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidDomainConfig));
        assert!(cache.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_invalid_refresh_keeps_previous_snapshot() {
        let (clock, cache, store) = setup();

        cache.resolve(&store, PATH).await.unwrap();
        store.insert(PATH, json!({"domains": [1, 2]}));
        clock.advance(CACHE_TTL_MS);

        let err = cache.resolve(&store, PATH).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidDomainConfig));
        assert!(cache.snapshot().unwrap().contains("university.edu"));
    }
}
