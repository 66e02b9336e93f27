//! Text and JSON rendering of command results

use lens_artifacts::{
    ArtifactBundle, DatedSignal, LatestSpreads, LoadedArtifact, ReportArtifact, SpreadReport,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;

const NO_DATA: &str = "data not available";

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// A no-data outcome; not an error
    pub fn no_data(&self) -> anyhow::Result<()> {
        if self.json {
            print_json(&json!({ "data": null, "message": NO_DATA }))
        } else {
            println!("{NO_DATA}");
            Ok(())
        }
    }

    pub fn symbols(&self, symbols: &BTreeSet<String>) -> anyhow::Result<()> {
        if self.json {
            return print_json(symbols);
        }
        for symbol in symbols {
            println!("{symbol}");
        }
        Ok(())
    }

    pub fn bundle(&self, bundle: &ArtifactBundle) -> anyhow::Result<()> {
        if self.json {
            return print_json(bundle);
        }
        println!("{} @ {}", bundle.symbol, bundle.partition);
        for artifact in [&bundle.signals, &bundle.analysis].into_iter().flatten() {
            print_artifact(artifact);
        }
        Ok(())
    }

    pub fn raw_report(&self, report: &ReportArtifact) -> anyhow::Result<()> {
        if self.json {
            return print_json(report);
        }
        println!("{}", report.text);
        Ok(())
    }

    pub fn latest_spreads(&self, latest: &LatestSpreads) -> anyhow::Result<()> {
        if self.json {
            return print_json(latest);
        }
        println!("source: {}", latest.source.key);
        print_spreads(&latest.report);
        Ok(())
    }

    pub fn spreads(&self, report: &SpreadReport) -> anyhow::Result<()> {
        if self.json {
            return print_json(report);
        }
        print_spreads(report);
        Ok(())
    }

    pub fn strongest(&self, best: &DatedSignal) -> anyhow::Result<()> {
        if self.json {
            return print_json(best);
        }
        println!(
            "{}  {:<8} {}",
            best.date,
            best.level().as_str(),
            best.signal.name
        );
        if !best.signal.description.is_empty() {
            println!("  {}", best.signal.description);
        }
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_artifact(artifact: &LoadedArtifact) {
    let record = &artifact.record;
    println!("\n[{}] {}", artifact.kind.as_str(), artifact.key);
    if let Some(bias) = &record.bias {
        println!("  bias: {bias}");
    }
    if let Some(recommendation) = &record.recommendation {
        println!("  recommendation: {recommendation}");
    }
    for signal in &record.signals {
        println!("  {:<8} {}", signal.level().as_str(), signal.name);
    }
    for risk in &record.risks {
        println!("  risk: {risk}");
    }
}

fn print_spreads(report: &SpreadReport) {
    println!("{} {}", report.ticker, report.date);
    if let Some(price) = report.reference_price {
        println!("reference price: {price:.2}");
    }
    for (name, value) in &report.indicators {
        println!("  {name}: {value}");
    }
    for (i, spread) in report.spreads.iter().enumerate() {
        let side = spread
            .spread_type
            .map_or_else(|| "?".to_string(), |t| t.to_string());
        println!("\n{}. {} {}", i + 1, side, spread.expiration);
        if !spread.strategy.is_empty() {
            println!("   strategy: {}", spread.strategy);
        }
        if let Some(credit) = spread.credit {
            println!("   credit: {credit:.2}");
        }
        if let Some(max_risk) = spread.max_risk {
            println!("   max risk: {max_risk:.2}");
        }
        if !spread.rationale.is_empty() {
            println!("   {}", spread.rationale);
        }
    }
}
