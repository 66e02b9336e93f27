//! Command-line interface for tickerlens

mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lens_artifacts::{ArtifactService, LensConfig, parse_report};
use lens_utils::LogConfig;
use std::path::PathBuf;
use tracing::info;

use crate::output::Output;

#[derive(Parser, Debug)]
#[command(name = "tickerlens")]
#[command(about = "Browse per-symbol analysis artifacts", long_about = None)]
struct Cli {
    /// Store root directory (overrides config and TICKERLENS_STORE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List symbols with signals or analysis artifacts
    Symbols,
    /// Show the newest signals and analysis for a symbol
    Latest { symbol: String },
    /// Show the newest spread report for a symbol, parsed
    Report {
        symbol: String,
        /// Print the raw markdown instead of the parsed spreads
        #[arg(long)]
        raw: bool,
    },
    /// Parse a spread report file from disk
    Parse { file: PathBuf },
    /// Show the strongest signal over a rolling window
    Strongest {
        symbol: String,
        /// Window length in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<LensConfig> {
        let config = match &self.config {
            Some(path) => LensConfig::from_file(path)?,
            None => LensConfig::default(),
        };
        let mut config = config.with_env_store_root();
        if let Some(root) = &self.root {
            config.store_root.clone_from(root);
        }
        config.validate()?;
        Ok(config)
    }

    fn service(&self) -> anyhow::Result<ArtifactService> {
        let service = ArtifactService::from_config(self.load_config()?)?;
        info!("Using store at {}", service.config().store_root.display());
        Ok(service)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        lens_utils::init_tracing_with(&LogConfig::default().json());
    } else {
        lens_utils::init_tracing();
    }

    let out = Output::new(cli.json);

    match &cli.command {
        Command::Symbols => {
            let symbols = cli.service()?.list_symbols().await;
            if symbols.is_empty() {
                out.no_data()
            } else {
                out.symbols(&symbols)
            }
        }
        Command::Latest { symbol } => match cli.service()?.resolve_latest(symbol).await {
            Ok(bundle) => out.bundle(&bundle),
            Err(err) if err.is_no_data() => out.no_data(),
            Err(err) => Err(err.into()),
        },
        Command::Report { symbol, raw: true } => {
            match cli.service()?.resolve_latest_report(symbol).await {
                Ok(report) => out.raw_report(&report),
                Err(err) if err.is_no_data() => out.no_data(),
                Err(err) => Err(err.into()),
            }
        }
        Command::Report { symbol, raw: false } => {
            match cli.service()?.latest_spreads(symbol).await {
                Ok(latest) => out.latest_spreads(&latest),
                Err(err) if err.is_no_data() => out.no_data(),
                Err(err) => Err(err.into()),
            }
        }
        Command::Parse { file } => {
            info!("Parsing report file {}", file.display());
            let text = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match parse_report(&text) {
                Some(report) => out.spreads(&report),
                None => out.no_data(),
            }
        }
        Command::Strongest { symbol, days } => {
            let service = cli.service()?;
            let days = days.unwrap_or(service.config().window_days);
            match service.strongest_over_window(symbol, days).await {
                Ok(Some(best)) => out.strongest(&best),
                Ok(None) => out.no_data(),
                Err(err) if err.is_no_data() => out.no_data(),
                Err(err) => Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_strongest_args() {
        let cli = Cli::parse_from(["tickerlens", "strongest", "AAPL", "--days", "3", "--json"]);
        assert!(cli.json);
        match cli.command {
            Command::Strongest { symbol, days } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(days, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_root_flag_overrides_config() {
        let cli = Cli::parse_from(["tickerlens", "--root", "/srv/artifacts", "symbols"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.store_root, PathBuf::from("/srv/artifacts"));
    }
}
