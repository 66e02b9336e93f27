//! ObjectStore trait definition

use crate::{ObjectKey, Partition, Result};
use async_trait::async_trait;

/// Read-only view of a date-partitioned object store
///
/// Implementations only need to list and fetch. Everything tickerlens knows
/// about an object (its kind, its symbol) comes from the filename, never from
/// the directory layout, so stores are free to organise objects however they
/// like as long as every key carries its partition.
///
/// Retries, timeouts and cancellation belong to the implementation; callers
/// treat every error as final.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every partition in the store, in no particular order
    async fn list_partitions(&self) -> Result<Vec<Partition>>;

    /// List the objects in one partition
    ///
    /// A partition with no objects, or one that does not exist, yields an
    /// empty list rather than an error.
    async fn list_keys(&self, partition: &Partition) -> Result<Vec<ObjectKey>>;

    /// Fetch the raw bytes of one object
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>>;

    /// List every object under the root in one flattened listing
    ///
    /// The default walks [`list_partitions`](Self::list_partitions) and
    /// [`list_keys`](Self::list_keys). Stores that can list recursively in a
    /// single call should override it.
    async fn list_all(&self) -> Result<Vec<ObjectKey>> {
        let partitions = self.list_partitions().await?;
        let mut keys = Vec::new();
        for partition in &partitions {
            keys.extend(self.list_keys(partition).await?);
        }
        tracing::debug!(
            "{} listed {} keys across {} partitions",
            self.name(),
            keys.len(),
            partitions.len()
        );
        Ok(keys)
    }

    /// Name used in logs
    fn name(&self) -> &str {
        "object-store"
    }
}
