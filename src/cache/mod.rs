//! Public read cache
//!
//! Public pages read the same lists on every visit. Successful reads are kept
//! for a short TTL in a moka cache, serialized as JSON so one cache holds every
//! resource type. Admin mutations invalidate the affected kind; failed reads
//! are never cached.

use anyhow::{Context, Result};
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::client::ClientError;
use crate::config::CacheConfig;
use crate::resource::{Resource, ResourceBackend, ResourceKind};

/// Maximum number of cached entries
const MAX_CAPACITY: u64 = 1_000;

/// JSON-serialized cached value
#[derive(Clone)]
struct CacheEntry {
    data: Arc<String>,
}

impl CacheEntry {
    fn new<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            data: Arc::new(json),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }
}

/// Short-lived cache in front of public reads
pub struct PublicCache {
    /// `None` when caching is disabled
    cache: Option<Cache<String, CacheEntry>>,
    ttl: Duration,
}

impl std::fmt::Debug for PublicCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicCache")
            .field("enabled", &self.cache.is_some())
            .field("entry_count", &self.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn list_key(kind: ResourceKind) -> String {
    format!("{}:list", kind.endpoint())
}

fn item_key(kind: ResourceKind, id: &str) -> String {
    format!("{}:item:{}", kind.endpoint(), id)
}

impl PublicCache {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_seconds);
        let cache = (config.enabled && config.ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CAPACITY)
                .time_to_live(ttl)
                .support_invalidation_closures()
                .build()
        });
        Self { cache, ttl }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            cache: None,
            ttl: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, |c| c.entry_count())
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.cache.as_ref()?.get(key).await?;
        match entry.deserialize() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dropping unreadable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: String, value: &T) {
        let Some(cache) = &self.cache else {
            return;
        };
        match CacheEntry::new(value) {
            Ok(entry) => cache.insert(key, entry).await,
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to cache value"),
        }
    }

    /// Whole collection, from cache when fresh
    pub async fn list<R: Resource>(
        &self,
        backend: &dyn ResourceBackend<R>,
    ) -> Result<Vec<R>, ClientError> {
        let key = list_key(R::KIND);
        if let Some(items) = self.lookup(&key).await {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(items);
        }
        let items = backend.list().await?;
        self.store(key, &items).await;
        Ok(items)
    }

    /// One record, from cache when fresh
    pub async fn get<R: Resource>(
        &self,
        backend: &dyn ResourceBackend<R>,
        id: &str,
    ) -> Result<R, ClientError> {
        let key = item_key(R::KIND, id);
        if let Some(item) = self.lookup(&key).await {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(item);
        }
        let item = backend.get(id).await?;
        self.store(key, &item).await;
        Ok(item)
    }

    /// Forget everything cached for one kind
    pub async fn invalidate(&self, kind: ResourceKind) {
        let Some(cache) = &self.cache else {
            return;
        };
        let prefix = format!("{}:", kind.endpoint());
        if let Err(e) = cache.invalidate_entries_if(move |key, _| key.starts_with(&prefix)) {
            tracing::warn!(error = %e, "Predicate invalidation failed, clearing cache");
            cache.invalidate_all();
        }
        cache.invalidate(&list_key(kind)).await;
        tracing::debug!(kind = kind.label(), "Cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Testimonial;
    use crate::resource::testing::{blog, testimonial, MemoryBackend};

    fn cache() -> PublicCache {
        PublicCache::new(&CacheConfig {
            enabled: true,
            ttl_seconds: 60,
        })
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let backend = MemoryBackend::with_items(vec![testimonial("t1", "Ana", "Hi")]);
        let cache = cache();

        assert_eq!(cache.list(&*backend).await.unwrap().len(), 1);
        assert_eq!(cache.list(&*backend).await.unwrap().len(), 1);
        assert_eq!(backend.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let backend = MemoryBackend::with_items(vec![testimonial("t1", "Ana", "Hi")]);
        let cache = cache();
        cache.list(&*backend).await.unwrap();

        cache.invalidate(ResourceKind::Testimonial).await;
        cache.list(&*backend).await.unwrap();
        assert_eq!(backend.calls(), vec!["list", "list"]);
    }

    #[tokio::test]
    async fn test_invalidate_leaves_other_kinds() {
        let blogs = MemoryBackend::with_items(vec![blog("b1", "A", "")]);
        let cache = cache();
        cache.list(&*blogs).await.unwrap();
        cache.get(&*blogs, "b1").await.unwrap();

        cache.invalidate(ResourceKind::Testimonial).await;
        cache.list(&*blogs).await.unwrap();
        cache.get(&*blogs, "b1").await.unwrap();
        assert_eq!(blogs.calls(), vec!["list", "get:b1"]);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let backend = MemoryBackend::<Testimonial>::with_items(vec![]);
        backend.fail_next_list(ClientError::Network("down".into()));
        let cache = cache();

        assert!(cache.list(&*backend).await.is_err());
        assert!(cache.list(&*backend).await.is_ok());
        assert_eq!(backend.calls(), vec!["list", "list"]);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let backend = MemoryBackend::with_items(vec![testimonial("t1", "Ana", "Hi")]);
        let cache = PublicCache::disabled();

        cache.list(&*backend).await.unwrap();
        cache.list(&*backend).await.unwrap();
        assert!(!cache.is_enabled());
        assert_eq!(backend.calls(), vec!["list", "list"]);
    }
}
