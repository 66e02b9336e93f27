//! Caching layer for object bodies
//!
//! The store is append-only from tickerlens' point of view: a key, once
//! written, never changes. Bodies can therefore be cached safely. Listings
//! are never cached, because new partitions and runs keep arriving.

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use lens_core::{ObjectKey, ObjectStore, Partition, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Object store wrapper that caches bodies returned by `get`
pub struct CachedStore {
    inner: Arc<dyn ObjectStore>,
    cache: Arc<RwLock<TimedCache<ObjectKey, Vec<u8>>>>,
}

impl CachedStore {
    /// Wrap `inner`, keeping bodies for `ttl`
    pub fn new(inner: Arc<dyn ObjectStore>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a cached body without touching the inner store
    pub async fn cached(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Return the cached body or fetch it with `fetcher` and cache the result
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: &ObjectKey, fetcher: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<u8>>>,
    {
        if let Some(body) = self.cached(key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(body);
        }

        tracing::debug!("Cache miss for {}", key);
        let body = fetcher().await?;

        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key.clone(), body.clone());

        Ok(body)
    }

    /// Drop one cached body
    pub async fn invalidate(&self, key: &ObjectKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Drop every cached body
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Number of cached bodies
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for CachedStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cache: Arc::clone(&self.cache),
        }
    }
}

#[async_trait]
impl ObjectStore for CachedStore {
    async fn list_partitions(&self) -> Result<Vec<Partition>> {
        self.inner.list_partitions().await
    }

    async fn list_keys(&self, partition: &Partition) -> Result<Vec<ObjectKey>> {
        self.inner.list_keys(partition).await
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        self.get_or_fetch(key, || self.inner.get(key)).await
    }

    async fn list_all(&self) -> Result<Vec<ObjectKey>> {
        self.inner.list_all().await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(Partition::parse("2024-01-15").unwrap(), name)
    }

    #[tokio::test]
    async fn test_get_caches_body() {
        let inner = Arc::new(MemoryStore::new().with_object("2024-01-15", "a.json", "[]"));
        let store = CachedStore::new(inner.clone(), Duration::from_secs(60));

        assert!(store.is_empty().await);
        assert_eq!(store.get(&key("a.json")).await.unwrap(), b"[]".to_vec());
        assert_eq!(store.len().await, 1);

        // A later write under the same key is not seen while cached.
        inner.insert(key("a.json"), "changed");
        assert_eq!(store.get(&key("a.json")).await.unwrap(), b"[]".to_vec());

        store.invalidate(&key("a.json")).await;
        assert_eq!(store.get(&key("a.json")).await.unwrap(), b"changed".to_vec());
    }

    #[tokio::test]
    async fn test_get_or_fetch_calls_fetcher_once() {
        let inner = Arc::new(MemoryStore::new());
        let store = CachedStore::new(inner, Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let body = store
                .get_or_fetch(&key("b.json"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(b"{}".to_vec())
                })
                .await
                .unwrap();
            assert_eq!(body, b"{}".to_vec());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = Arc::new(MemoryStore::new());
        let store = CachedStore::new(inner.clone(), Duration::from_secs(60));

        assert!(store.get(&key("late.json")).await.is_err());
        assert!(store.is_empty().await);

        inner.insert(key("late.json"), "[]");
        assert!(store.get(&key("late.json")).await.is_ok());
    }

    #[tokio::test]
    async fn test_listings_pass_through() {
        let inner = Arc::new(MemoryStore::new().with_object("2024-01-15", "a.json", "[]"));
        let store = CachedStore::new(inner.clone(), Duration::from_secs(60));
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        inner.insert(key("b.json"), "[]");
        assert_eq!(store.list_all().await.unwrap().len(), 2);
        assert_eq!(store.name(), "memory");

        store.clear().await;
        assert!(store.is_empty().await);
    }
}
