//! Spread report parser
//!
//! Spread reports are semi-structured markdown, one per symbol:
//!
//! ```text
//! # AAPL Credit Spread Analysis
//! **Date:** 2024-01-15
//! **Reference Price:** $185.50
//!
//! - **RSI (14):** 58.3
//! - **Trend:** Bullish above 50 SMA
//!
//! ### 1. Bull Put Credit Spread (2024-02-16)
//! **Strategy:** Sell 180P / Buy 175P
//! **Est. Credit:** $1.25 | **Max Risk:** $3.75
//! **Analysis:**
//! Support at 180 has held three times.
//! ---
//! ```
//!
//! A single forward pass classifies each line ([`line::classify`]) and feeds
//! it to [`machine::ReportMachine`]. The parser never fails: missing sections
//! leave fields empty. A report that yields no spread records comes back as
//! `None`, meaning "no data" rather than an error.

pub mod line;
pub mod machine;

use crate::model::SpreadReport;

pub use line::{LineKind, classify};
pub use machine::{ParseState, ReportMachine};

/// Parse a report, returning `None` when it contains no spread records
pub fn parse_report(text: &str) -> Option<SpreadReport> {
    let report = parse_report_lenient(text);
    if report.spreads.is_empty() {
        tracing::debug!("Report for {:?} produced no spreads", report.ticker);
        None
    } else {
        Some(report)
    }
}

/// Parse a report, keeping the scalars and indicators even without spreads
pub fn parse_report_lenient(text: &str) -> SpreadReport {
    let mut machine = ReportMachine::new();
    for line in text.lines() {
        machine.step(classify(line));
    }
    machine.finish()
}
