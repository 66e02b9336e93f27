//! In-memory object store

use async_trait::async_trait;
use lens_core::{Error, ObjectKey, ObjectStore, Partition, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

/// Object store backed by an in-memory map
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<ObjectKey, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, builder style
    ///
    /// Objects whose partition label is not a `YYYY-MM-DD` date are skipped,
    /// the same way [`FsStore`](super::FsStore) ignores such directories.
    pub fn with_object(
        self,
        partition: &str,
        name: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        match Partition::parse(partition) {
            Ok(partition) => self.insert(ObjectKey::new(partition, name), body),
            Err(err) => tracing::warn!("Skipping object: {}", err),
        }
        self
    }

    /// Add or replace an object
    pub fn insert(&self, key: ObjectKey, body: impl Into<Vec<u8>>) {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects.insert(key, body.into());
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_partitions(&self) -> Result<Vec<Partition>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let partitions: BTreeSet<Partition> =
            objects.keys().map(|key| key.partition.clone()).collect();
        Ok(partitions.into_iter().collect())
    }

    async fn list_keys(&self, partition: &Partition) -> Result<Vec<ObjectKey>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects
            .keys()
            .filter(|key| &key.partition == partition)
            .cloned()
            .collect())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| Error::ObjectMissing(key.path()))
    }

    async fn list_all(&self) -> Result<Vec<ObjectKey>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.list_partitions().await.unwrap().is_empty());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let store = MemoryStore::new()
            .with_object("2024-01-02", "signals_AAPL_1.json", "[]")
            .with_object("2024-01-01", "signals_AAPL_0.json", "[]")
            .with_object("2024-01-02", "MSFT_gemini_analysis_1.json", "{}");

        assert_eq!(store.len(), 3);

        let partitions = store.list_partitions().await.unwrap();
        assert_eq!(partitions.len(), 2);

        let day2 = Partition::parse("2024-01-02").unwrap();
        assert_eq!(store.list_keys(&day2).await.unwrap().len(), 2);

        let missing = Partition::parse("2023-12-31").unwrap();
        assert!(store.list_keys(&missing).await.unwrap().is_empty());
    }

    #[test]
    fn test_with_object_skips_bad_partition() {
        let store = MemoryStore::new().with_object("latest", "signals_AAPL_1.json", "[]");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get() {
        let store = MemoryStore::new().with_object("2024-01-02", "a.json", "body");
        let key = ObjectKey::new(Partition::parse("2024-01-02").unwrap(), "a.json");
        assert_eq!(store.get(&key).await.unwrap(), b"body".to_vec());

        let other = ObjectKey::new(Partition::parse("2024-01-02").unwrap(), "b.json");
        assert!(matches!(
            store.get(&other).await,
            Err(Error::ObjectMissing(_))
        ));
    }
}
