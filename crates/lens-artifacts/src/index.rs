//! Symbol index over the object store

use crate::naming::{ArtifactKind, ArtifactName};
use lens_core::ObjectStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Enumerates the symbols that have any structured artifact in the store
pub struct ArtifactIndex {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactIndex {
    /// Create an index over `store`
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Sorted, upper-cased set of symbols with a signals or analysis artifact
    ///
    /// An empty or unreadable store yields an empty set; the failure is logged
    /// but never surfaced, since missing data is not exceptional here.
    pub async fn list_symbols(&self) -> BTreeSet<String> {
        let keys = match self.store.list_all().await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(
                    store = self.store.name(),
                    "Symbol listing failed, returning no symbols: {}",
                    err
                );
                return BTreeSet::new();
            }
        };

        let symbols: BTreeSet<String> = keys
            .iter()
            .filter_map(|key| ArtifactName::classify(&key.name))
            .filter(|name| ArtifactKind::STRUCTURED.contains(&name.kind))
            .map(|name| name.symbol)
            .collect();

        tracing::debug!("Indexed {} symbols from {} keys", symbols.len(), keys.len());
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use lens_core::{ObjectKey, Partition};

    struct BrokenStore;

    #[async_trait]
    impl ObjectStore for BrokenStore {
        async fn list_partitions(&self) -> lens_core::Result<Vec<Partition>> {
            Err(lens_core::Error::Store("connection refused".to_string()))
        }

        async fn list_keys(&self, _partition: &Partition) -> lens_core::Result<Vec<ObjectKey>> {
            Err(lens_core::Error::Store("connection refused".to_string()))
        }

        async fn get(&self, key: &ObjectKey) -> lens_core::Result<Vec<u8>> {
            Err(lens_core::Error::ObjectMissing(key.path()))
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_symbols() {
        let index = ArtifactIndex::new(Arc::new(MemoryStore::new()));
        assert!(index.list_symbols().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_has_no_symbols() {
        let index = ArtifactIndex::new(Arc::new(BrokenStore));
        assert!(index.list_symbols().await.is_empty());
    }

    #[tokio::test]
    async fn test_symbols_are_normalised_and_sorted() {
        let store = MemoryStore::new()
            .with_object("2024-01-15", "signals_msft_0930.json", "[]")
            .with_object("2024-01-15", "AAPL_gemini_analysis_0930.json", "{}")
            .with_object("2024-01-16", "signals_AAPL_0930.json", "[]")
            .with_object("2024-01-16", "TSLA_spread_analysis.md", "# TSLA")
            .with_object("2024-01-16", "notes.txt", "");
        let index = ArtifactIndex::new(Arc::new(store));

        let symbols: Vec<String> = index.list_symbols().await.into_iter().collect();
        assert_eq!(symbols, vec!["AAPL".to_string(), "MSFT".to_string()]);
    }
}
