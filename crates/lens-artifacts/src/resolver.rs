//! Latest-artifact resolution
//!
//! The resolver walks partitions newest first and stops at the first one that
//! holds at least one wanted artifact for the symbol. It then loads only what
//! that partition holds: a kind missing there is *not* backfilled from an
//! older partition, so a bundle never mixes partitions.
//!
//! Within a partition, several runs of the same kind are disambiguated by
//! taking the lexicographically greatest filename (filenames end in a sortable
//! timestamp).
//!
//! Any store failure during the scan aborts the resolution. A partition that
//! cannot be listed is never skipped in favour of an older one, because that
//! could silently return stale data.

use crate::config::{LensConfig, ScanMode};
use crate::error::{ArtifactError, Result};
use crate::model::AnalysisRecord;
use crate::naming::{ArtifactKind, ArtifactName, normalize_symbol};
use lens_core::{ObjectKey, ObjectStore, Partition};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A decoded structured artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedArtifact {
    pub key: ObjectKey,
    pub kind: ArtifactKind,
    pub record: AnalysisRecord,
}

/// Artifacts resolved for one symbol, all from a single partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactBundle {
    pub symbol: String,
    pub partition: Partition,
    pub signals: Option<LoadedArtifact>,
    pub analysis: Option<LoadedArtifact>,
}

impl ArtifactBundle {
    /// The loaded artifact of `kind`, if the partition had one
    pub fn get(&self, kind: ArtifactKind) -> Option<&LoadedArtifact> {
        match kind {
            ArtifactKind::Signals => self.signals.as_ref(),
            ArtifactKind::GeminiAnalysis => self.analysis.as_ref(),
            ArtifactKind::SpreadReport => None,
        }
    }

    /// Kinds present in the bundle
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        ArtifactKind::STRUCTURED
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }

    /// Whether both structured kinds were present in the partition
    pub fn is_complete(&self) -> bool {
        self.signals.is_some() && self.analysis.is_some()
    }
}

/// Raw text of the newest spread report for a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportArtifact {
    pub symbol: String,
    pub key: ObjectKey,
    pub text: String,
}

/// Newest-first partition resolver
pub struct LatestResolver {
    store: Arc<dyn ObjectStore>,
    config: Arc<LensConfig>,
}

impl LatestResolver {
    /// Create a resolver over `store`
    pub fn new(store: Arc<dyn ObjectStore>, config: Arc<LensConfig>) -> Self {
        Self { store, config }
    }

    /// Resolve the newest partition holding signals or analysis for `symbol`
    pub async fn resolve_latest(&self, symbol: &str) -> Result<ArtifactBundle> {
        let symbol = normalize_symbol(symbol)?;
        let Some((partition, keys)) = self
            .find_latest(&symbol, &ArtifactKind::STRUCTURED)
            .await?
        else {
            return Err(ArtifactError::NotFound { symbol });
        };

        let mut bundle = ArtifactBundle {
            symbol: symbol.clone(),
            partition,
            signals: None,
            analysis: None,
        };

        for (kind, key) in keys {
            let record = self.load_record(&key, &symbol).await?;
            let loaded = LoadedArtifact { key, kind, record };
            match kind {
                ArtifactKind::Signals => bundle.signals = Some(loaded),
                ArtifactKind::GeminiAnalysis => bundle.analysis = Some(loaded),
                ArtifactKind::SpreadReport => {}
            }
        }

        if !bundle.is_complete() {
            tracing::debug!(
                "{} bundle in {} holds only {:?}; older partitions are not consulted",
                symbol,
                bundle.partition,
                bundle.kinds()
            );
        }
        tracing::info!(
            "Resolved {} to partition {} ({:?})",
            symbol,
            bundle.partition,
            bundle.kinds()
        );
        Ok(bundle)
    }

    /// Resolve the newest spread report for `symbol`
    pub async fn resolve_latest_report(&self, symbol: &str) -> Result<ReportArtifact> {
        let symbol = normalize_symbol(symbol)?;
        let key = self
            .find_latest(&symbol, &[ArtifactKind::SpreadReport])
            .await?
            .and_then(|(_, mut keys)| keys.remove(&ArtifactKind::SpreadReport))
            .ok_or_else(|| ArtifactError::NotFound {
                symbol: symbol.clone(),
            })?;

        let bytes = self.store.get(&key).await?;
        if bytes.len() > self.config.max_report_bytes {
            return Err(ArtifactError::malformed(
                &key,
                format!(
                    "report is {} bytes, limit is {}",
                    bytes.len(),
                    self.config.max_report_bytes
                ),
            ));
        }
        let text = String::from_utf8(bytes).map_err(|e| ArtifactError::malformed(&key, e))?;

        tracing::info!("Resolved {} report to {}", symbol, key);
        Ok(ReportArtifact { symbol, key, text })
    }

    /// Fetch and decode one structured artifact
    pub(crate) async fn load_record(&self, key: &ObjectKey, symbol: &str) -> Result<AnalysisRecord> {
        let bytes = self.store.get(key).await?;
        AnalysisRecord::decode(&bytes, symbol).map_err(|reason| ArtifactError::malformed(key, reason))
    }

    /// Newest partition with any of `kinds` for `symbol`, and the chosen key per kind
    async fn find_latest(
        &self,
        symbol: &str,
        kinds: &[ArtifactKind],
    ) -> Result<Option<(Partition, BTreeMap<ArtifactKind, ObjectKey>)>> {
        match self.config.scan_mode {
            ScanMode::Sequential => self.find_latest_sequential(symbol, kinds).await,
            ScanMode::Flattened => self.find_latest_flattened(symbol, kinds).await,
        }
    }

    async fn find_latest_sequential(
        &self,
        symbol: &str,
        kinds: &[ArtifactKind],
    ) -> Result<Option<(Partition, BTreeMap<ArtifactKind, ObjectKey>)>> {
        let mut partitions = self.store.list_partitions().await?;
        partitions.sort_unstable_by(|a, b| b.cmp(a));
        partitions.dedup();

        for partition in partitions {
            let keys = self.store.list_keys(&partition).await?;
            let selected = select_in_partition(&partition, &keys, symbol, kinds);
            tracing::debug!(
                "Scanned {} for {}: {} match(es)",
                partition,
                symbol,
                selected.len()
            );
            if !selected.is_empty() {
                return Ok(Some((partition, selected)));
            }
        }
        Ok(None)
    }

    async fn find_latest_flattened(
        &self,
        symbol: &str,
        kinds: &[ArtifactKind],
    ) -> Result<Option<(Partition, BTreeMap<ArtifactKind, ObjectKey>)>> {
        let mut by_partition: BTreeMap<Partition, Vec<ObjectKey>> = BTreeMap::new();
        for key in self.store.list_all().await? {
            by_partition
                .entry(key.partition.clone())
                .or_default()
                .push(key);
        }

        // Same newest-first, first-hit selection as the sequential scan.
        Ok(by_partition.into_iter().rev().find_map(|(partition, keys)| {
            let selected = select_in_partition(&partition, &keys, symbol, kinds);
            (!selected.is_empty()).then_some((partition, selected))
        }))
    }
}

/// Pick, per wanted kind, the greatest matching filename within one partition
pub(crate) fn select_in_partition(
    partition: &Partition,
    keys: &[ObjectKey],
    symbol: &str,
    kinds: &[ArtifactKind],
) -> BTreeMap<ArtifactKind, ObjectKey> {
    let mut selected: BTreeMap<ArtifactKind, ObjectKey> = BTreeMap::new();
    for key in keys.iter().filter(|key| &key.partition == partition) {
        let Some(name) = ArtifactName::classify(&key.name) else {
            continue;
        };
        if name.symbol != symbol || !kinds.contains(&name.kind) {
            continue;
        }
        match selected.get(&name.kind) {
            Some(current) if current.name >= key.name => {}
            _ => {
                selected.insert(name.kind, key.clone());
            }
        }
    }
    selected
}
