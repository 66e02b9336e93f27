//! Domain records read out of stored artifacts
//!
//! Everything here is a read-only projection of something in the object store.
//! Structured artifacts decode into [`AnalysisRecord`]; textual spread reports
//! parse into [`SpreadReport`].

use crate::ranker::StrengthLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Indicator value that is either a number or the raw text it was read from
///
/// Values that fail numeric parsing keep their text, trimmed of surrounding
/// whitespace, so nothing read from a report is ever dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    /// Parsed numeric value
    Number(f64),
    /// Trimmed original text, kept when it is not a plain number
    Text(String),
}

impl IndicatorValue {
    /// Parse a raw value, falling back to the trimmed original text
    ///
    /// A leading `$` and thousands separators are ignored for the numeric
    /// attempt. Anything else (units, trailing words, percentages) keeps the
    /// value as text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match parse_amount(raw) {
            Some(value) => Self::Number(value),
            None => Self::Text(raw.to_string()),
        }
    }

    /// The numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// The text value, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Symbol-scoped indicator name to value mapping
pub type IndicatorMap = BTreeMap<String, IndicatorValue>;

/// Parse a plain or dollar-denominated amount such as `$1,234.50`
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A categorical technical observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signal {
    /// Short name of the signal
    #[serde(alias = "signal")]
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Strength label; only its first token is ranked
    #[serde(alias = "strength_label")]
    pub strength: String,
    /// Signal category (momentum, trend, volume, ...)
    pub category: String,
}

impl Signal {
    /// Create a signal with a name and strength label
    pub fn new(name: impl Into<String>, strength: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strength: strength.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Ranked strength of this signal's label
    pub fn level(&self) -> StrengthLevel {
        StrengthLevel::from_label(&self.strength)
    }
}

/// Decoded structured analysis for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRecord {
    /// Ticker symbol
    #[serde(alias = "ticker")]
    pub symbol: String,
    /// Generation timestamp as written by the producer
    pub timestamp: Option<String>,
    /// Trading date the analysis refers to
    pub date: Option<String>,
    /// Technical signals
    pub signals: Vec<Signal>,
    /// Overall directional bias
    #[serde(alias = "overall_bias")]
    pub bias: Option<String>,
    /// Trading recommendation
    #[serde(alias = "trading_recommendation")]
    pub recommendation: Option<String>,
    /// Risk factors
    #[serde(alias = "key_risks")]
    pub risks: Vec<String>,
    /// Named price levels (support, resistance, ...)
    pub key_levels: IndicatorMap,
}

impl AnalysisRecord {
    /// Decode an artifact body
    ///
    /// Accepts either a full record object or a bare array of signals. An
    /// empty symbol is filled from `symbol`, which the caller takes from the
    /// filename. The error string is the decoder's message.
    pub fn decode(bytes: &[u8], symbol: &str) -> Result<Self, String> {
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;

        let mut record = match value {
            serde_json::Value::Array(_) => {
                let signals: Vec<Signal> =
                    serde_json::from_value(value).map_err(|e| e.to_string())?;
                Self {
                    signals,
                    ..Default::default()
                }
            }
            serde_json::Value::Object(_) => {
                serde_json::from_value(value).map_err(|e| e.to_string())?
            }
            other => {
                return Err(format!(
                    "expected an object or an array of signals, found {}",
                    json_type_name(&other)
                ));
            }
        };

        if record.symbol.trim().is_empty() {
            record.symbol = symbol.to_string();
        }
        Ok(record)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Option side of a credit spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadType {
    Put,
    Call,
}

impl fmt::Display for SpreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => f.write_str("Put"),
            Self::Call => f.write_str("Call"),
        }
    }
}

/// One options strategy extracted from a spread report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadRecord {
    /// Put or call side, when the header names one
    #[serde(rename = "type")]
    pub spread_type: Option<SpreadType>,
    /// Expiration as written in the header
    pub expiration: String,
    /// Strategy legs
    pub strategy: String,
    /// Estimated credit in dollars
    pub credit: Option<f64>,
    /// Maximum risk in dollars
    pub max_risk: Option<f64>,
    /// Space-joined analysis text
    pub rationale: String,
}

/// Everything read out of one spread report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    /// Subject ticker from the title line (informational)
    pub ticker: String,
    /// Report date
    pub date: String,
    /// Underlying reference price
    pub reference_price: Option<f64>,
    /// Indicator bullets
    pub indicators: IndicatorMap,
    /// Spread records in document order
    pub spreads: Vec<SpreadRecord>,
}
