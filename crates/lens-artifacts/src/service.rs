//! Artifact service: the entry point used by presentation layers
//!
//! Wraps the index, the resolver and the ranker behind one object:
//! - [`ArtifactService::list_symbols`]
//! - [`ArtifactService::resolve_latest`]
//! - [`ArtifactService::latest_spreads`]
//! - [`ArtifactService::strongest_over_window`]
//!
//! Every operation completes before returning and holds no state between
//! calls; the store does all of the I/O.

use crate::config::LensConfig;
use crate::error::{ArtifactError, Result};
use crate::index::ArtifactIndex;
use crate::model::SpreadReport;
use crate::naming::{ArtifactKind, normalize_symbol};
use crate::ranker::{
    DatedSignal, MAX_WINDOW_DAYS, strongest_across_days, strongest_of_day, window_dates,
};
use crate::report::parse_report;
use crate::resolver::{ArtifactBundle, LatestResolver, ReportArtifact, select_in_partition};
use crate::store::{CachedStore, FsStore};
use chrono::{NaiveDate, Utc};
use lens_core::{ObjectStore, Partition};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Parsed spreads together with the report they came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSpreads {
    pub source: ReportArtifact,
    pub report: SpreadReport,
}

/// Facade over the artifact store
pub struct ArtifactService {
    store: Arc<dyn ObjectStore>,
    config: Arc<LensConfig>,
    index: ArtifactIndex,
    resolver: LatestResolver,
}

impl ArtifactService {
    /// Create a service over an existing store
    pub fn new(store: Arc<dyn ObjectStore>, config: Arc<LensConfig>) -> Self {
        Self {
            index: ArtifactIndex::new(Arc::clone(&store)),
            resolver: LatestResolver::new(Arc::clone(&store), Arc::clone(&config)),
            store,
            config,
        }
    }

    /// Create a service over the filesystem store at `config.store_root`
    ///
    /// Object bodies are cached unless `object_cache_ttl` is zero.
    pub fn from_config(config: LensConfig) -> Result<Self> {
        config.validate()?;
        let fs: Arc<dyn ObjectStore> = Arc::new(FsStore::new(&config.store_root));
        let store: Arc<dyn ObjectStore> = if config.object_cache_ttl.is_zero() {
            fs
        } else {
            Arc::new(CachedStore::new(fs, config.object_cache_ttl))
        };
        tracing::debug!(
            "Opened {} store at {}",
            store.name(),
            config.store_root.display()
        );
        Ok(Self::new(store, Arc::new(config)))
    }

    /// The configuration in use
    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// Sorted set of symbols with any structured artifact
    pub async fn list_symbols(&self) -> BTreeSet<String> {
        self.index.list_symbols().await
    }

    /// Newest co-located signals/analysis bundle for `symbol`
    pub async fn resolve_latest(&self, symbol: &str) -> Result<ArtifactBundle> {
        self.resolver.resolve_latest(symbol).await
    }

    /// Raw text of the newest spread report for `symbol`
    pub async fn resolve_latest_report(&self, symbol: &str) -> Result<ReportArtifact> {
        self.resolver.resolve_latest_report(symbol).await
    }

    /// Newest spread report for `symbol`, parsed
    ///
    /// A report with no spread sections is [`ArtifactError::ParseEmpty`].
    pub async fn latest_spreads(&self, symbol: &str) -> Result<LatestSpreads> {
        let source = self.resolve_latest_report(symbol).await?;
        match parse_report(&source.text) {
            Some(report) => {
                tracing::info!(
                    "Parsed {} spreads for {} from {}",
                    report.spreads.len(),
                    source.symbol,
                    source.key
                );
                Ok(LatestSpreads { source, report })
            }
            None => Err(ArtifactError::ParseEmpty {
                symbol: source.symbol,
            }),
        }
    }

    /// Strongest daily-champion signal over the last `days` days, ending today (UTC)
    pub async fn strongest_over_window(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Option<DatedSignal>> {
        let today = Utc::now().date_naive();
        self.strongest_over_window_at(symbol, days, today).await
    }

    /// Strongest daily-champion signal over the `days` days ending at `today`
    ///
    /// Each calendar date in the window is visited oldest first, whether or not
    /// it has data. A date with a per-symbol analysis artifact contributes its
    /// single strongest signal; the best of those wins, the earliest date
    /// taking ties. Windows longer than [`MAX_WINDOW_DAYS`] are rejected.
    pub async fn strongest_over_window_at(
        &self,
        symbol: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<Option<DatedSignal>> {
        let symbol = normalize_symbol(symbol)?;
        if days > MAX_WINDOW_DAYS {
            return Err(ArtifactError::InvalidWindow {
                days,
                max: MAX_WINDOW_DAYS,
            });
        }
        let mut champions = Vec::new();

        for date in window_dates(today, days) {
            let partition = Partition::from_date(date);
            let keys = self.store.list_keys(&partition).await?;
            let selected =
                select_in_partition(&partition, &keys, &symbol, &[ArtifactKind::GeminiAnalysis]);
            let Some(key) = selected.get(&ArtifactKind::GeminiAnalysis) else {
                tracing::debug!("No analysis for {} on {}", symbol, date);
                continue;
            };

            let record = self.resolver.load_record(key, &symbol).await?;
            match strongest_of_day(&record.signals) {
                Some(signal) => champions.push(DatedSignal {
                    date,
                    signal: signal.clone(),
                }),
                None => tracing::debug!("Analysis for {} on {} has no signals", symbol, date),
            }
        }

        let best = strongest_across_days(champions);
        if let Some(best) = &best {
            tracing::info!(
                "Strongest {} signal over {} days: {} ({}) on {}",
                symbol,
                days,
                best.signal.name,
                best.level(),
                best.date
            );
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service(store: MemoryStore) -> ArtifactService {
        ArtifactService::new(Arc::new(store), Arc::new(LensConfig::default()))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn analysis(signals: &[(&str, &str)]) -> String {
        let signals: Vec<serde_json::Value> = signals
            .iter()
            .map(|(name, strength)| serde_json::json!({"name": name, "strength": strength}))
            .collect();
        serde_json::json!({ "signals": signals }).to_string()
    }

    #[tokio::test]
    async fn test_window_uses_day_champions() {
        let store = MemoryStore::new()
            .with_object(
                "2024-01-09",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("a", "HIGH"), ("b", "HIGH")]),
            )
            .with_object(
                "2024-01-10",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("c", "EXTREME"), ("d", "LOW")]),
            );

        let best = service(store)
            .strongest_over_window_at("AAPL", 7, date(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(best.date, date(10));
        assert_eq!(best.signal.name, "c");
    }

    #[tokio::test]
    async fn test_window_tie_goes_to_earliest_date() {
        let store = MemoryStore::new()
            .with_object(
                "2024-01-05",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("early", "MEDIUM")]),
            )
            .with_object(
                "2024-01-08",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("late", "MEDIUM setup")]),
            );

        let best = service(store)
            .strongest_over_window_at("AAPL", 7, date(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(best.signal.name, "early");
    }

    #[tokio::test]
    async fn test_window_ignores_dates_outside_range_and_signal_files() {
        let store = MemoryStore::new()
            .with_object(
                "2024-01-02",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("too old", "EXTREME")]),
            )
            .with_object(
                "2024-01-09",
                "signals_AAPL_1.json",
                r#"[{"name": "not analysis", "strength": "EXTREME"}]"#,
            )
            .with_object(
                "2024-01-09",
                "AAPL_gemini_analysis_1.json",
                analysis(&[("in window", "LOW")]),
            );

        let best = service(store)
            .strongest_over_window_at("AAPL", 7, date(10))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(best.signal.name, "in window");
    }

    #[tokio::test]
    async fn test_window_without_data_is_none() {
        let store = MemoryStore::new().with_object(
            "2024-01-09",
            "AAPL_gemini_analysis_1.json",
            analysis(&[]),
        );
        let result = service(store)
            .strongest_over_window_at("AAPL", 7, date(10))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_window_malformed_day_fails() {
        let store =
            MemoryStore::new().with_object("2024-01-09", "AAPL_gemini_analysis_1.json", "nope");
        let err = service(store)
            .strongest_over_window_at("AAPL", 7, date(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_window_too_long_is_rejected() {
        let store = MemoryStore::new().with_object(
            "2024-01-09",
            "AAPL_gemini_analysis_1.json",
            analysis(&[("a", "HIGH")]),
        );
        let service = service(store);

        let err = service
            .strongest_over_window_at("AAPL", u32::MAX, date(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::InvalidWindow { days: u32::MAX, .. }
        ));

        let best = service
            .strongest_over_window_at("AAPL", MAX_WINDOW_DAYS, date(10))
            .await
            .unwrap();
        assert_eq!(best.unwrap().signal.name, "a");
    }

    #[tokio::test]
    async fn test_window_ending_today() {
        let today = Utc::now().date_naive();
        let store = MemoryStore::new().with_object(
            &Partition::from_date(today).to_string(),
            "AAPL_gemini_analysis_1.json",
            analysis(&[("fresh", "LOW")]),
        );

        let best = service(store)
            .strongest_over_window("AAPL", 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(best.signal.name, "fresh");
        assert_eq!(best.date, today);
    }

    #[tokio::test]
    async fn test_latest_spreads_parse_empty() {
        let store = MemoryStore::new().with_object(
            "2024-01-09",
            "AAPL_spread_analysis.md",
            "# AAPL\nNo setups today.",
        );
        let err = service(store).latest_spreads("AAPL").await.unwrap_err();
        assert!(matches!(err, ArtifactError::ParseEmpty { .. }));
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn test_latest_spreads() {
        let store = MemoryStore::new().with_object(
            "2024-01-09",
            "AAPL_spread_analysis.md",
            "# AAPL\n### Put Credit Spread (Feb 16)\n**Strategy:** Sell 180P / Buy 175P",
        );
        let latest = service(store).latest_spreads("aapl").await.unwrap();
        assert_eq!(latest.source.symbol, "AAPL");
        assert_eq!(latest.report.spreads.len(), 1);
        assert_eq!(latest.report.spreads[0].strategy, "Sell 180P / Buy 175P");
    }

    #[tokio::test]
    async fn test_from_config_reads_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let partition_dir = dir.path().join("2024-01-15");
        std::fs::create_dir_all(&partition_dir).unwrap();
        std::fs::write(partition_dir.join("signals_NVDA_1.json"), "[]").unwrap();

        let config = LensConfig::builder()
            .store_root(dir.path())
            .build()
            .unwrap();
        let service = ArtifactService::from_config(config).unwrap();

        let symbols: Vec<String> = service.list_symbols().await.into_iter().collect();
        assert_eq!(symbols, vec!["NVDA".to_string()]);
        let bundle = service.resolve_latest("NVDA").await.unwrap();
        assert!(bundle.signals.unwrap().record.signals.is_empty());
    }
}
