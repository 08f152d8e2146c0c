//! Query module - filtering and ranking over the loaded table

mod filters;

pub use filters::{FilterCriteria, FlightQuery, SortOrder, DEFAULT_TOP_N};

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("required column missing: {0}")]
    InvalidSchema(String),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Surface a missing column as [`QueryError::InvalidSchema`] instead of
/// letting the query produce garbage downstream.
pub(crate) fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), QueryError> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(QueryError::InvalidSchema((*column).to_string()));
        }
    }
    Ok(())
}
