//! Error types for artifact resolution and parsing

use thiserror::Error;

/// Artifact resolution specific errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// No partition anywhere holds a matching artifact for the symbol
    #[error("No artifacts found for {symbol}")]
    NotFound { symbol: String },

    /// A matched structured artifact failed to decode
    #[error("Malformed artifact {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// A report was found but yielded no spread records
    #[error("Report for {symbol} contains no spreads")]
    ParseEmpty { symbol: String },

    /// Symbol is empty or contains characters that cannot appear in a filename
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Rolling window longer than the service accepts
    #[error("Window of {days} days exceeds the limit of {max}")]
    InvalidWindow { days: u32, max: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The object store failed
    #[error(transparent)]
    Store(#[from] lens_core::Error),
}

impl ArtifactError {
    /// Whether this is an expected "no data" outcome rather than a failure
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ParseEmpty { .. })
    }

    pub(crate) fn malformed(key: impl ToString, reason: impl ToString) -> Self {
        Self::Malformed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for artifact operations
pub type Result<T> = std::result::Result<T, ArtifactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArtifactError::NotFound {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(err.to_string(), "No artifacts found for AAPL");

        let err = ArtifactError::malformed("2024-01-02/signals_AAPL_1.json", "expected value");
        assert_eq!(
            err.to_string(),
            "Malformed artifact 2024-01-02/signals_AAPL_1.json: expected value"
        );
    }

    #[test]
    fn test_no_data_classification() {
        assert!(ArtifactError::NotFound {
            symbol: "AAPL".to_string()
        }
        .is_no_data());
        assert!(ArtifactError::ParseEmpty {
            symbol: "AAPL".to_string()
        }
        .is_no_data());
        assert!(!ArtifactError::malformed("k", "bad").is_no_data());
        assert!(!ArtifactError::InvalidWindow { days: 9999, max: 3660 }.is_no_data());
        assert!(!ArtifactError::Store(lens_core::Error::Store("down".to_string())).is_no_data());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ArtifactError = lens_core::Error::Store("timeout".to_string()).into();
        assert_eq!(err.to_string(), "Store error: timeout");
    }
}
