//! CSV Data Loader Module
//! Loads the city-pair CSV and applies the cleaning pass using Polars.

use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{COL_CITY1, COL_CITY2, COL_DATE, COL_MONTH, REQUIRED_COLUMNS};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),
    #[error("input file contains no rows")]
    EmptyInput,
    #[error("required column missing: {0}")]
    InvalidSchema(String),
    #[error("month value does not match Mon-YY: {0:?}")]
    MalformedDate(String),
    #[error("failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load the city-pair CSV and return the cleaned table.
///
/// Cleaning rewrites `City1`/`City2` to title case and derives a `Date`
/// column from `Month` (first day of the month). The returned DataFrame is
/// the table handle every query function takes; it is never mutated after
/// this point.
pub fn load_city_pairs(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    let meta = std::fs::metadata(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.len() == 0 {
        return Err(LoaderError::EmptyInput);
    }

    // Use lazy evaluation for memory efficiency, then collect
    let mut df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10_000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    if df.height() == 0 {
        return Err(LoaderError::EmptyInput);
    }

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| df.column(c).is_err()) {
        return Err(LoaderError::InvalidSchema((*missing).to_string()));
    }

    title_case_column(&mut df, COL_CITY1)?;
    title_case_column(&mut df, COL_CITY2)?;

    let dates = parse_month_column(&df)?;
    df.with_column(DateChunked::from_naive_date(COL_DATE.into(), dates).into_series())?;

    Ok(df)
}

/// Rewrite a string column to title case in place.
fn title_case_column(df: &mut DataFrame, name: &str) -> Result<(), LoaderError> {
    let ca = df.column(name)?.str()?;
    let cleaned: Vec<Option<String>> = ca.into_iter().map(|v| v.map(title_case)).collect();
    df.with_column(Column::new(name.into(), cleaned))?;
    Ok(())
}

/// First letter of each whitespace-separated word upper, the rest lower.
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parse every `Month` value as `%b-%y`, pinned to day 1.
///
/// A single unparsable value fails the whole load.
fn parse_month_column(df: &DataFrame) -> Result<Vec<NaiveDate>, LoaderError> {
    let months = df.column(COL_MONTH)?.str()?;
    let mut dates = Vec::with_capacity(months.len());
    for raw in months {
        let raw = raw.ok_or_else(|| LoaderError::MalformedDate(String::from("<null>")))?;
        let date = NaiveDate::parse_from_str(&format!("01-{raw}"), "%d-%b-%y")
            .map_err(|_| LoaderError::MalformedDate(raw.to_string()))?;
        dates.push(date);
    }
    Ok(dates)
}
