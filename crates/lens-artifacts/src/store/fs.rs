//! Filesystem-backed object store
//!
//! Layout:
//!
//! ```text
//! <root>/
//! ├── 2024-01-15/
//! │   ├── signals_AAPL_20240115_0930.json
//! │   ├── AAPL_gemini_analysis_20240115_0930.json
//! │   └── AAPL_spread_analysis_20240115.md
//! └── 2024-01-16/
//!     └── ...
//! ```
//!
//! Directories whose names are not `YYYY-MM-DD` dates are ignored, as are
//! nested directories inside a partition.

use async_trait::async_trait;
use lens_core::{Error, ObjectKey, ObjectStore, Partition, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        self.root.join(key.partition.as_str()).join(&key.name)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn list_partitions(&self) -> Result<Vec<Partition>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Store root {} does not exist", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut partitions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(label) = name.to_str() else {
                continue;
            };
            match Partition::parse(label) {
                Ok(partition) => partitions.push(partition),
                Err(_) => tracing::trace!("Ignoring non-partition directory {}", label),
            }
        }
        Ok(partitions)
    }

    async fn list_keys(&self, partition: &Partition) -> Result<Vec<ObjectKey>> {
        let dir = self.root.join(partition.as_str());
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                keys.push(ObjectKey::new(partition.clone(), name));
            }
        }
        Ok(keys)
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        match tokio::fs::read(self.object_path(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::ObjectMissing(key.path())),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn name(&self) -> &str {
        "fs"
    }
}
