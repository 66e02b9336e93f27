//! Report state machine
//!
//! | State         | Input                 | Action                                 | Next          |
//! |---------------|-----------------------|----------------------------------------|---------------|
//! | any           | `SpreadHeader`        | flush the open record, open a new one  | `Idle`        |
//! | any           | `AnalysisStart`       | append any inline text                 | `InRationale` |
//! | `InRationale` | `Text`                | append to the open record's rationale  | `InRationale` |
//! | any           | `Boundary`            | none (the record stays open)           | `Idle`        |
//! | any           | scalar / field line   | set the field                          | unchanged     |
//! | any           | `Blank`, `BoldHeader` | none                                   | unchanged     |
//! | `Idle`        | `Text`                | none                                   | `Idle`        |
//!
//! End of input flushes the open record.

use super::line::LineKind;
use crate::model::{SpreadRecord, SpreadReport};

/// Parser state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Outside any rationale block
    #[default]
    Idle,
    /// Accumulating rationale text for the open record
    InRationale,
}

/// Line-driven state machine building a [`SpreadReport`]
#[derive(Debug, Default)]
pub struct ReportMachine {
    state: ParseState,
    open: Option<SpreadRecord>,
    report: SpreadReport,
}

impl ReportMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// The record currently being filled, if any
    pub fn open_record(&self) -> Option<&SpreadRecord> {
        self.open.as_ref()
    }

    /// Records flushed so far
    pub fn flushed(&self) -> &[SpreadRecord] {
        &self.report.spreads
    }

    /// Apply one classified line
    pub fn step(&mut self, line: LineKind) {
        match line {
            LineKind::SpreadHeader {
                spread_type,
                expiration,
            } => {
                self.flush();
                self.open = Some(SpreadRecord {
                    spread_type,
                    expiration,
                    ..Default::default()
                });
                self.state = ParseState::Idle;
            }
            LineKind::AnalysisStart(inline) => {
                if self.open.is_none() {
                    tracing::debug!("Analysis block outside any spread section");
                }
                if let Some(text) = inline {
                    self.append_rationale(&text);
                }
                self.state = ParseState::InRationale;
            }
            LineKind::Text(text) => {
                if self.state == ParseState::InRationale {
                    self.append_rationale(&text);
                }
            }
            LineKind::Boundary => {
                self.state = ParseState::Idle;
            }
            LineKind::Title(ticker) => {
                if let Some(ticker) = ticker {
                    self.report.ticker = ticker;
                }
            }
            LineKind::Date(date) => {
                self.report.date = date;
            }
            LineKind::ReferencePrice(price) => {
                self.report.reference_price = price;
            }
            LineKind::Indicator { name, value } => {
                self.report.indicators.insert(name, value);
            }
            LineKind::Strategy(strategy) => match self.open.as_mut() {
                Some(record) => record.strategy = strategy,
                None => tracing::debug!("Strategy line outside any spread section"),
            },
            LineKind::Pricing { credit, max_risk } => match self.open.as_mut() {
                Some(record) => {
                    if credit.is_some() {
                        record.credit = credit;
                    }
                    if max_risk.is_some() {
                        record.max_risk = max_risk;
                    }
                }
                None => tracing::debug!("Pricing line outside any spread section"),
            },
            LineKind::Blank | LineKind::BoldHeader => {}
        }
    }

    /// Flush the open record and return the finished report
    pub fn finish(mut self) -> SpreadReport {
        self.flush();
        self.report
    }

    fn flush(&mut self) {
        if let Some(record) = self.open.take() {
            self.report.spreads.push(record);
        }
    }

    fn append_rationale(&mut self, text: &str) {
        let Some(record) = self.open.as_mut() else {
            return;
        };
        if !record.rationale.is_empty() {
            record.rationale.push(' ');
        }
        record.rationale.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpreadType;

    fn header(expiration: &str) -> LineKind {
        LineKind::SpreadHeader {
            spread_type: Some(SpreadType::Put),
            expiration: expiration.to_string(),
        }
    }

    fn text(t: &str) -> LineKind {
        LineKind::Text(t.to_string())
    }

    #[test]
    fn test_header_opens_without_flushing_first() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        assert!(machine.open_record().is_some());
        assert!(machine.flushed().is_empty());
    }

    #[test]
    fn test_second_header_flushes_previous() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        machine.step(header("Mar 15"));
        assert_eq!(machine.flushed().len(), 1);
        assert_eq!(machine.flushed()[0].expiration, "Feb 16");
        assert_eq!(machine.open_record().unwrap().expiration, "Mar 15");
    }

    #[test]
    fn test_rationale_only_in_rationale_state() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        machine.step(text("ignored, not in rationale"));
        machine.step(LineKind::AnalysisStart(None));
        assert_eq!(machine.state(), ParseState::InRationale);
        machine.step(text("one"));
        machine.step(LineKind::Blank);
        machine.step(text("two"));
        assert_eq!(machine.open_record().unwrap().rationale, "one two");
    }

    #[test]
    fn test_boundary_ends_rationale_but_keeps_record_open() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        machine.step(LineKind::AnalysisStart(Some("start".to_string())));
        machine.step(LineKind::Boundary);
        assert_eq!(machine.state(), ParseState::Idle);
        machine.step(text("after divider"));
        assert!(machine.flushed().is_empty());

        machine.step(LineKind::Strategy("Sell 180P / Buy 175P".to_string()));
        let report = machine.finish();
        assert_eq!(report.spreads.len(), 1);
        assert_eq!(report.spreads[0].rationale, "start");
        assert_eq!(report.spreads[0].strategy, "Sell 180P / Buy 175P");
    }

    #[test]
    fn test_header_resets_rationale_state() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        machine.step(LineKind::AnalysisStart(None));
        machine.step(header("Mar 15"));
        assert_eq!(machine.state(), ParseState::Idle);
        machine.step(text("not rationale"));
        assert_eq!(machine.open_record().unwrap().rationale, "");
    }

    #[test]
    fn test_fields_without_open_record_are_ignored() {
        let mut machine = ReportMachine::new();
        machine.step(LineKind::Strategy("orphan".to_string()));
        machine.step(LineKind::Pricing {
            credit: Some(1.0),
            max_risk: None,
        });
        machine.step(LineKind::AnalysisStart(Some("orphan".to_string())));
        machine.step(text("orphan"));
        assert!(machine.finish().spreads.is_empty());
    }

    #[test]
    fn test_pricing_halves_merge() {
        let mut machine = ReportMachine::new();
        machine.step(header("Feb 16"));
        machine.step(LineKind::Pricing {
            credit: Some(1.25),
            max_risk: None,
        });
        machine.step(LineKind::Pricing {
            credit: None,
            max_risk: Some(3.75),
        });
        let report = machine.finish();
        assert_eq!(report.spreads[0].credit, Some(1.25));
        assert_eq!(report.spreads[0].max_risk, Some(3.75));
    }

    #[test]
    fn test_scalars_apply_in_any_state() {
        let mut machine = ReportMachine::new();
        machine.step(LineKind::Title(Some("AAPL".to_string())));
        machine.step(LineKind::Title(None));
        machine.step(LineKind::Date("2024-01-15".to_string()));
        machine.step(LineKind::ReferencePrice(Some(185.5)));
        let report = machine.finish();
        assert_eq!(report.ticker, "AAPL");
        assert_eq!(report.date, "2024-01-15");
        assert_eq!(report.reference_price, Some(185.5));
        assert!(report.spreads.is_empty());
    }
}
