//! Artifact resolution and report parsing for tickerlens
//!
//! Upstream analysis pipelines drop one file per symbol per run into a store
//! partitioned by calendar date. This crate reads that store back:
//!
//! - [`ArtifactIndex`]: which symbols have structured artifacts at all
//! - [`LatestResolver`]: the newest partition holding a symbol's signals and
//!   analysis, without mixing partitions
//! - [`report`]: a line-oriented state machine over markdown spread reports
//! - [`ranker`]: the strongest signal of a day, and over a rolling window
//!
//! [`ArtifactService`] ties them together for presentation layers.
//!
//! # Example
//!
//! ```rust,ignore
//! use lens_artifacts::{ArtifactService, LensConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LensConfig::default().with_env_store_root();
//!     let service = ArtifactService::from_config(config)?;
//!
//!     for symbol in service.list_symbols().await {
//!         match service.strongest_over_window(&symbol, 7).await? {
//!             Some(best) => println!("{symbol}: {} ({})", best.signal.name, best.level()),
//!             None => println!("{symbol}: data not available"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod naming;
pub mod ranker;
pub mod report;
pub mod resolver;
pub mod service;
pub mod store;

pub use config::{LensConfig, LensConfigBuilder, STORE_ROOT_ENV, ScanMode};
pub use error::{ArtifactError, Result};
pub use index::ArtifactIndex;
pub use model::{
    AnalysisRecord, IndicatorMap, IndicatorValue, Signal, SpreadRecord, SpreadReport, SpreadType,
};
pub use naming::{ArtifactKind, ArtifactName, normalize_symbol};
pub use ranker::{
    DatedSignal, MAX_WINDOW_DAYS, StrengthLevel, strongest_across_days, strongest_of_day,
};
pub use report::{parse_report, parse_report_lenient};
pub use resolver::{ArtifactBundle, LatestResolver, LoadedArtifact, ReportArtifact};
pub use service::{ArtifactService, LatestSpreads};
pub use store::{CachedStore, FsStore, MemoryStore};

pub use lens_core::{ObjectKey, ObjectStore, Partition};
