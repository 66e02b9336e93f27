//! Configuration for artifact resolution

use crate::error::{ArtifactError, Result};
use crate::ranker::MAX_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the store root
pub const STORE_ROOT_ENV: &str = "TICKERLENS_STORE_ROOT";

/// How the resolver walks partitions
///
/// Both modes select the same bundle: the newest partition with a match wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// List partitions, then list each one newest first, stopping at the first hit
    #[default]
    Sequential,
    /// Fetch one flattened listing up front and filter in memory
    Flattened,
}

/// Configuration for artifact resolution operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    /// Root directory of the filesystem store
    pub store_root: PathBuf,

    /// Number of calendar days in the rolling signal window
    pub window_days: u32,

    /// Partition scan strategy for the resolver
    pub scan_mode: ScanMode,

    /// Reports larger than this are rejected as malformed
    pub max_report_bytes: usize,

    /// Lifetime of cached object bodies (zero disables caching)
    pub object_cache_ttl: Duration,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("./data"),
            window_days: 7,
            scan_mode: ScanMode::Sequential,
            max_report_bytes: 1024 * 1024, // 1 MiB
            object_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl LensConfig {
    /// Create a new configuration builder
    pub fn builder() -> LensConfigBuilder {
        LensConfigBuilder::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArtifactError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ArtifactError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the store root from the environment
    pub fn with_env_store_root(mut self) -> Self {
        if let Ok(root) = std::env::var(STORE_ROOT_ENV) {
            self.store_root = PathBuf::from(root);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(ArtifactError::ConfigError(
                "window_days must be greater than 0".to_string(),
            ));
        }

        if self.window_days > MAX_WINDOW_DAYS {
            return Err(ArtifactError::ConfigError(format!(
                "window_days must be at most {MAX_WINDOW_DAYS}"
            )));
        }

        if self.max_report_bytes == 0 {
            return Err(ArtifactError::ConfigError(
                "max_report_bytes must be greater than 0".to_string(),
            ));
        }

        if self.store_root.as_os_str().is_empty() {
            return Err(ArtifactError::ConfigError(
                "store_root must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for LensConfig
#[derive(Debug, Default)]
pub struct LensConfigBuilder {
    store_root: Option<PathBuf>,
    window_days: Option<u32>,
    scan_mode: Option<ScanMode>,
    max_report_bytes: Option<usize>,
    object_cache_ttl: Option<Duration>,
}

impl LensConfigBuilder {
    /// Set the store root directory
    pub fn store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.store_root = Some(root.into());
        self
    }

    /// Set the rolling window length in days
    pub fn window_days(mut self, days: u32) -> Self {
        self.window_days = Some(days);
        self
    }

    /// Set the partition scan strategy
    pub fn scan_mode(mut self, mode: ScanMode) -> Self {
        self.scan_mode = Some(mode);
        self
    }

    /// Set the report size limit
    pub fn max_report_bytes(mut self, bytes: usize) -> Self {
        self.max_report_bytes = Some(bytes);
        self
    }

    /// Set the object cache lifetime
    pub fn object_cache_ttl(mut self, ttl: Duration) -> Self {
        self.object_cache_ttl = Some(ttl);
        self
    }

    /// Load the store root from the environment
    pub fn with_env_store_root(mut self) -> Self {
        if let Ok(root) = std::env::var(STORE_ROOT_ENV) {
            self.store_root = Some(PathBuf::from(root));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<LensConfig> {
        let defaults = LensConfig::default();

        let config = LensConfig {
            store_root: self.store_root.unwrap_or(defaults.store_root),
            window_days: self.window_days.unwrap_or(defaults.window_days),
            scan_mode: self.scan_mode.unwrap_or(defaults.scan_mode),
            max_report_bytes: self.max_report_bytes.unwrap_or(defaults.max_report_bytes),
            object_cache_ttl: self.object_cache_ttl.unwrap_or(defaults.object_cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
