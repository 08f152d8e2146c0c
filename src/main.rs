//! Citypair Insights - Australian Domestic Flight City-Pair Analysis
//!
//! Loads the city-pair CSV (default `dom_city_pair.csv`, or the first
//! positional argument) and prints the standing reports.

use anyhow::Context;
use citypair_insights::data::DEFAULT_DATA_PATH;
use citypair_insights::load_city_pairs;
use citypair_insights::report::{run_report, standing_reports, ReportKind};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let table = load_city_pairs(&path).with_context(|| format!("loading {path}"))?;
    println!("Loaded {} rows from {}", table.height(), path);
    println!();

    for report in standing_reports(&table)? {
        println!("{report}");
    }

    let correlation = run_report(&table, &ReportKind::DistanceLoadCorrelation)?;
    println!("{correlation}");

    Ok(())
}
