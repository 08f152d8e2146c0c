//! Filter Module
//! City-pair lookup, top-N ranking and the composite multi-field filter.
//!
//! Every function takes the table handle explicitly and returns a new
//! DataFrame; a query that matches nothing returns a zero-row frame, never
//! an error. Callers branch on emptiness to decide what to display.

use chrono::NaiveDate;
use polars::prelude::*;

use super::{require_columns, QueryError};
use crate::data::{COL_CITY1, COL_CITY2, COL_DATE};

/// Row count returned by rankings unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Optional criteria for [`FlightQuery::composite`]. Unset fields pass all
/// rows through for that dimension.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub city1: Option<String>,
    pub city2: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
}

/// Read-only queries over the loaded city-pair table.
pub struct FlightQuery;

impl FlightQuery {
    /// Rows where both cities match exactly (case-sensitive against the
    /// title-cased form).
    pub fn city_pair(
        df: &DataFrame,
        city1: &str,
        city2: &str,
    ) -> Result<DataFrame, QueryError> {
        require_columns(df, &[COL_CITY1, COL_CITY2])?;
        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(COL_CITY1)
                    .eq(lit(city1))
                    .and(col(COL_CITY2).eq(lit(city2))),
            )
            .collect()?;
        Ok(filtered)
    }

    /// First `n` rows after a stable sort by `column`. Ties keep the
    /// original row order; a short table returns fewer than `n` rows.
    pub fn top_n(
        df: &DataFrame,
        column: &str,
        order: SortOrder,
        n: usize,
    ) -> Result<DataFrame, QueryError> {
        require_columns(df, &[column])?;
        let sorted = df.sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(order == SortOrder::Descending)
                .with_maintain_order(true),
        )?;
        Ok(sorted.head(Some(n)))
    }

    /// Apply each set criterion independently. The date range only applies
    /// when BOTH bounds are set (inclusive); a single bound alone is
    /// ignored. That both-or-neither behavior is part of the contract.
    pub fn composite(df: &DataFrame, criteria: &FilterCriteria) -> Result<DataFrame, QueryError> {
        require_columns(df, &[COL_CITY1, COL_CITY2, COL_DATE])?;

        let mut predicate: Option<Expr> = None;
        if let Some(city1) = &criteria.city1 {
            predicate = and_expr(predicate, col(COL_CITY1).eq(lit(city1.clone())));
        }
        if let Some(city2) = &criteria.city2 {
            predicate = and_expr(predicate, col(COL_CITY2).eq(lit(city2.clone())));
        }

        let filtered = match predicate {
            Some(expr) => df.clone().lazy().filter(expr).collect()?,
            None => df.clone(),
        };

        if let (Some(start), Some(end)) = (criteria.date_start, criteria.date_end) {
            let dates = filtered.column(COL_DATE)?.as_materialized_series().date()?;
            let mask: BooleanChunked = dates
                .as_date_iter()
                .map(|d| Some(d.is_some_and(|d| d >= start && d <= end)))
                .collect();
            return Ok(filtered.filter(&mask)?);
        }

        Ok(filtered)
    }
}

fn and_expr(acc: Option<Expr>, next: Expr) -> Option<Expr> {
    Some(match acc {
        Some(expr) => expr.and(next),
        None => next,
    })
}
