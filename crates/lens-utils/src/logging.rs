//! Logging and tracing utilities

use crate::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    init_tracing_with(&LogConfig::default());
}

/// Initialize tracing subscriber from a [`LogConfig`]
///
/// `RUST_LOG` still wins over `config.level` when it is set. Calling this
/// twice is harmless; the second subscriber is simply not installed.
pub fn init_tracing_with(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(err) = result {
        tracing::debug!("tracing already initialised: {}", err);
    }
}
