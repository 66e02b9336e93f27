//! Line classification for spread reports

use crate::model::{IndicatorValue, SpreadType, parse_amount};
use regex::Regex;
use std::sync::LazyLock;

static EXPIRATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("expiration pattern is valid"));

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\$?\s*-?[\d,]+(?:\.\d+)?)").expect("amount pattern is valid")
});

static INDICATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*]\s+\*\*([^*]+?):\*\*\s*(.*)$").expect("indicator pattern is valid")
});

const DATE_LABEL: &str = "**Date:**";
const PRICE_LABEL: &str = "**Reference Price:**";
const STRATEGY_LABEL: &str = "**Strategy:**";
const CREDIT_LABEL: &str = "**Est. Credit:**";
const RISK_LABEL: &str = "**Max Risk:**";
const ANALYSIS_LABEL: &str = "**Analysis:**";

/// What one report line means to the parser
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Empty or whitespace-only
    Blank,
    /// `# ...` title; carries the first ticker-shaped token, if any
    Title(Option<String>),
    /// `**Date:** ...`
    Date(String),
    /// `**Reference Price:** $...`
    ReferencePrice(Option<f64>),
    /// `... Credit Spread (...)` opens a new spread record
    SpreadHeader {
        spread_type: Option<SpreadType>,
        expiration: String,
    },
    /// `**Strategy:** ...`
    Strategy(String),
    /// `**Est. Credit:** $X ... **Max Risk:** $Y`; either half may be absent
    Pricing {
        credit: Option<f64>,
        max_risk: Option<f64>,
    },
    /// `**Analysis:**`, with any text that follows on the same line
    AnalysisStart(Option<String>),
    /// `###` heading or `---` divider
    Boundary,
    /// `- **Name:** value` bullet without "Spread"
    Indicator { name: String, value: IndicatorValue },
    /// Any other line starting with `**`
    BoldHeader,
    /// Plain text
    Text(String),
}

/// Classify one line
///
/// Rules are tried in a fixed order and the first match wins. The order
/// matters: a spread header is usually a `###` heading, and date or price
/// lines may be written as bullets. A field label only counts at the start of
/// the line, after an optional `- ` or `* ` bullet marker.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some(heading) = trimmed.strip_prefix("# ") {
        return LineKind::Title(ticker_token(heading));
    }

    if let Some(rest) = field(trimmed, DATE_LABEL) {
        return LineKind::Date(rest.trim().to_string());
    }

    if let Some(rest) = field(trimmed, PRICE_LABEL) {
        return LineKind::ReferencePrice(leading_amount(rest));
    }

    if trimmed.contains("Credit Spread") {
        if let Some(caps) = EXPIRATION_RE.captures(trimmed) {
            return LineKind::SpreadHeader {
                spread_type: spread_type(trimmed),
                expiration: caps[1].trim().to_string(),
            };
        }
    }

    if let Some(rest) = field(trimmed, STRATEGY_LABEL) {
        return LineKind::Strategy(rest.trim().to_string());
    }

    if field(trimmed, CREDIT_LABEL).is_some() || field(trimmed, RISK_LABEL).is_some() {
        return LineKind::Pricing {
            credit: after(trimmed, CREDIT_LABEL).and_then(leading_amount),
            max_risk: after(trimmed, RISK_LABEL).and_then(leading_amount),
        };
    }

    if let Some(rest) = field(trimmed, ANALYSIS_LABEL) {
        let rest = rest.trim();
        return LineKind::AnalysisStart((!rest.is_empty()).then(|| rest.to_string()));
    }

    if trimmed.starts_with("###") || trimmed.starts_with("---") {
        return LineKind::Boundary;
    }

    if !trimmed.contains("Spread") {
        if let Some(caps) = INDICATOR_RE.captures(trimmed) {
            return LineKind::Indicator {
                name: caps[1].trim().to_string(),
                value: IndicatorValue::parse(&caps[2]),
            };
        }
    }

    if trimmed.starts_with("**") {
        return LineKind::BoldHeader;
    }

    LineKind::Text(trimmed.to_string())
}

/// Text after `label` when the line, less any bullet marker, starts with it
fn field<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let body = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map_or(line, str::trim_start);
    body.strip_prefix(label)
}

fn after<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.find(label).map(|idx| &line[idx + label.len()..])
}

fn leading_amount(text: &str) -> Option<f64> {
    AMOUNT_RE
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1].replace(' ', "")))
}

fn spread_type(line: &str) -> Option<SpreadType> {
    if line.contains("Put") {
        Some(SpreadType::Put)
    } else if line.contains("Call") {
        Some(SpreadType::Call)
    } else {
        None
    }
}

fn ticker_token(heading: &str) -> Option<String> {
    heading
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|word| {
            word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                && word
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-')
        })
        .map(str::to_string)
}
