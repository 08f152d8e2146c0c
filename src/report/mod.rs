//! Report module - dispatches report identifiers to query handlers
//!
//! Each identifier the original dashboard exposed as a button maps to one
//! handler here. Handlers only call the query and stats layers and return
//! plain tabular data or scalars; rendering is left to whatever consumes
//! the [`Report`].

use polars::prelude::*;
use rayon::prelude::*;
use serde_json::{json, Value};
use std::fmt;

use crate::data::{COL_AIRCRAFT_TRIPS, COL_DISTANCE_KM, COL_LOAD_FACTOR, COL_PASSENGER_TRIPS};
use crate::query::{FlightQuery, QueryError, SortOrder, DEFAULT_TOP_N};
use crate::stats::{CityStats, StatsCalculator};

/// Identifier for one report the dashboard can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    MostPassengerTrips,
    MostAircraftTrips,
    HighestLoadFactor,
    LowestLoadFactor,
    CityPair { city1: String, city2: String },
    CitySummary { city: String },
    DistanceLoadCorrelation,
}

impl ReportKind {
    /// The four fixed rankings the dashboard always shows.
    pub const STANDING: [ReportKind; 4] = [
        ReportKind::MostPassengerTrips,
        ReportKind::MostAircraftTrips,
        ReportKind::HighestLoadFactor,
        ReportKind::LowestLoadFactor,
    ];

    pub fn title(&self) -> String {
        match self {
            ReportKind::MostPassengerTrips => String::from("Top routes by passenger trips"),
            ReportKind::MostAircraftTrips => String::from("Top routes by aircraft trips"),
            ReportKind::HighestLoadFactor => String::from("Highest passenger load factor"),
            ReportKind::LowestLoadFactor => String::from("Lowest passenger load factor"),
            ReportKind::CityPair { city1, city2 } => format!("Flights {city1} - {city2}"),
            ReportKind::CitySummary { city } => format!("Summary for {city}"),
            ReportKind::DistanceLoadCorrelation => {
                String::from("Distance vs load factor correlation")
            }
        }
    }
}

/// Result payload of a report: a table, a city summary, or a scalar.
pub enum ReportBody {
    Table(DataFrame),
    Summary(CityStats),
    Scalar(f64),
}

pub struct Report {
    pub title: String,
    pub body: ReportBody,
}

/// Run a single report against the loaded table.
pub fn run_report(df: &DataFrame, kind: &ReportKind) -> Result<Report, QueryError> {
    let body = match kind {
        ReportKind::MostPassengerTrips => ReportBody::Table(FlightQuery::top_n(
            df,
            COL_PASSENGER_TRIPS,
            SortOrder::Descending,
            DEFAULT_TOP_N,
        )?),
        ReportKind::MostAircraftTrips => ReportBody::Table(FlightQuery::top_n(
            df,
            COL_AIRCRAFT_TRIPS,
            SortOrder::Descending,
            DEFAULT_TOP_N,
        )?),
        ReportKind::HighestLoadFactor => ReportBody::Table(FlightQuery::top_n(
            df,
            COL_LOAD_FACTOR,
            SortOrder::Descending,
            DEFAULT_TOP_N,
        )?),
        ReportKind::LowestLoadFactor => ReportBody::Table(FlightQuery::top_n(
            df,
            COL_LOAD_FACTOR,
            SortOrder::Ascending,
            DEFAULT_TOP_N,
        )?),
        ReportKind::CityPair { city1, city2 } => {
            ReportBody::Table(FlightQuery::city_pair(df, city1, city2)?)
        }
        ReportKind::CitySummary { city } => {
            ReportBody::Summary(StatsCalculator::city_stats(df, city)?)
        }
        ReportKind::DistanceLoadCorrelation => {
            ReportBody::Scalar(StatsCalculator::pearson(df, COL_DISTANCE_KM, COL_LOAD_FACTOR)?)
        }
    };

    Ok(Report {
        title: kind.title(),
        body,
    })
}

/// Evaluate the four standing rankings in parallel.
pub fn standing_reports(df: &DataFrame) -> Result<Vec<Report>, QueryError> {
    ReportKind::STANDING
        .par_iter()
        .map(|kind| run_report(df, kind))
        .collect()
}

impl Report {
    /// JSON form of the payload for consumers that render elsewhere.
    /// Tables become an array of row objects.
    pub fn to_json(&self) -> Value {
        let body = match &self.body {
            ReportBody::Table(df) => table_to_json(df),
            ReportBody::Summary(stats) => serde_json::to_value(stats).unwrap_or(Value::Null),
            ReportBody::Scalar(v) => {
                serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
            }
        };
        json!({ "title": self.title, "body": body })
    }
}

fn table_to_json(df: &DataFrame) -> Value {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Value> = (0..df.height())
        .map(|i| {
            let mut row = serde_json::Map::with_capacity(names.len());
            for (name, column) in names.iter().zip(df.get_columns()) {
                let value = column
                    .get(i)
                    .map(any_value_to_json)
                    .unwrap_or(Value::Null);
                row.insert(name.clone(), value);
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn any_value_to_json(av: AnyValue) -> Value {
    if av.is_null() {
        return Value::Null;
    }
    match av {
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(ref s) => Value::String(s.to_string()),
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Date(_) => Value::String(av.to_string()),
        _ => av
            .extract::<f64>()
            .and_then(serde_json::Number::from_f64)
            .map_or_else(
                || Value::String(av.to_string().trim_matches('"').to_string()),
                Value::Number,
            ),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        match &self.body {
            ReportBody::Table(df) if df.height() == 0 => {
                writeln!(f, "No matching records found.")
            }
            ReportBody::Table(df) => writeln!(f, "{df}"),
            ReportBody::Summary(stats) => {
                writeln!(f, "Total trips: {}", stats.total_trips)?;
                if stats.avg_load_factor.is_nan() {
                    writeln!(f, "Average load factor: No data")?;
                } else {
                    writeln!(f, "Average load factor: {:.2}%", stats.avg_load_factor)?;
                }
                writeln!(f, "Most traveled to: {}", stats.most_traveled_to)
            }
            ReportBody::Scalar(v) if v.is_nan() => writeln!(f, "No data"),
            ReportBody::Scalar(v) => writeln!(f, "r = {v:.4}"),
        }
    }
}
