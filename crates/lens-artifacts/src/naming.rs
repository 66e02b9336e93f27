//! Filename classification
//!
//! Every artifact's kind and symbol are read off its filename:
//!
//! | Kind | Pattern |
//! |------|---------|
//! | [`ArtifactKind::Signals`] | `signals_<SYMBOL>_<suffix>` |
//! | [`ArtifactKind::GeminiAnalysis`] | `<SYMBOL>_gemini_analysis_<suffix>` |
//! | [`ArtifactKind::SpreadReport`] | `<SYMBOL>_spread_analysis<_ or .><suffix>` |
//!
//! The suffix embeds a sortable run timestamp, so among several runs of the
//! same kind and symbol the lexicographically greatest filename is the newest.

use crate::error::{ArtifactError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SIGNALS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^signals_([^_/]+)_").expect("signals pattern is valid")
});

static GEMINI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^_/]+)_gemini_analysis_").expect("gemini pattern is valid")
});

static SPREAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([^_/]+)_spread_analysis[_.]").expect("spread pattern is valid")
});

/// Kind of a stored artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Structured technical signals
    Signals,
    /// Structured per-symbol model analysis
    GeminiAnalysis,
    /// Textual options spread report
    SpreadReport,
}

impl ArtifactKind {
    /// Kinds that feed the symbol index and the latest-bundle resolver
    pub const STRUCTURED: [ArtifactKind; 2] = [ArtifactKind::Signals, ArtifactKind::GeminiAnalysis];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signals => "signals",
            Self::GeminiAnalysis => "gemini-analysis",
            Self::SpreadReport => "spread-report",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind and symbol read from a filename
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    pub kind: ArtifactKind,
    /// Upper-cased symbol token
    pub symbol: String,
}

impl ArtifactName {
    /// Classify a filename, or `None` if it matches no known pattern
    ///
    /// Patterns are tried in a fixed order (signals, analysis, report), so a
    /// filename never belongs to two kinds.
    pub fn classify(filename: &str) -> Option<Self> {
        let patterns: [(&Regex, ArtifactKind); 3] = [
            (&SIGNALS_RE, ArtifactKind::Signals),
            (&GEMINI_RE, ArtifactKind::GeminiAnalysis),
            (&SPREAD_RE, ArtifactKind::SpreadReport),
        ];

        patterns.into_iter().find_map(|(re, kind)| {
            re.captures(filename).map(|caps| Self {
                kind,
                symbol: caps[1].to_uppercase(),
            })
        })
    }

    /// Whether this name is of `kind` for `symbol` (already normalised)
    pub fn is(&self, kind: ArtifactKind, symbol: &str) -> bool {
        self.kind == kind && self.symbol == symbol
    }
}

/// Normalise a caller-supplied symbol to the form used in filenames
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty()
        || symbol
            .chars()
            .any(|c| c == '_' || c == '/' || c.is_whitespace())
    {
        return Err(ArtifactError::InvalidSymbol(symbol.to_string()));
    }
    Ok(symbol.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_signals() {
        let name = ArtifactName::classify("signals_AAPL_20240115_0930.json").unwrap();
        assert_eq!(name.kind, ArtifactKind::Signals);
        assert_eq!(name.symbol, "AAPL");
    }

    #[test]
    fn test_classify_gemini_lowercase() {
        let name = ArtifactName::classify("brk.b_gemini_analysis_20240115.json").unwrap();
        assert_eq!(name.kind, ArtifactKind::GeminiAnalysis);
        assert_eq!(name.symbol, "BRK.B");
    }

    #[test]
    fn test_classify_spread_report() {
        let name = ArtifactName::classify("SPY_spread_analysis.md").unwrap();
        assert_eq!(name.kind, ArtifactKind::SpreadReport);
        assert_eq!(name.symbol, "SPY");

        let name = ArtifactName::classify("SPY_spread_analysis_20240115.md").unwrap();
        assert_eq!(name.kind, ArtifactKind::SpreadReport);
    }

    #[test]
    fn test_classify_unknown() {
        assert!(ArtifactName::classify("README.md").is_none());
        assert!(ArtifactName::classify("signals.json").is_none());
        assert!(ArtifactName::classify("AAPL_prices_20240115.csv").is_none());
        assert!(ArtifactName::classify("AAPL_gemini_analysis").is_none());
    }

    #[test]
    fn test_is_matches_kind_and_symbol() {
        let name = ArtifactName::classify("signals_msft_1.json").unwrap();
        assert!(name.is(ArtifactKind::Signals, "MSFT"));
        assert!(!name.is(ArtifactKind::GeminiAnalysis, "MSFT"));
        assert!(!name.is(ArtifactKind::Signals, "MSFTX"));
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("AA_PL").is_err());
        assert!(normalize_symbol("../etc").is_err());
    }
}
