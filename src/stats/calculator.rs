//! Statistics Calculator Module
//! Per-city summary statistics and the Pearson correlation helper.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::data::{COL_CITY1, COL_CITY2, COL_LOAD_FACTOR};
use crate::query::{require_columns, QueryError};

/// Sentinel destination when a city has no outbound rows.
pub const NO_DATA: &str = "No data";

/// Summary statistics for a single origin city.
///
/// `avg_load_factor` is NaN when the city has no rows. That is a valid
/// "no data" value, not an error; display code must branch on it rather
/// than feed it to a numeric format.
#[derive(Debug, Clone, Serialize)]
pub struct CityStats {
    pub city: String,
    pub total_trips: usize,
    pub avg_load_factor: f64,
    pub most_traveled_to: String,
}

/// Read-only statistical computations over the loaded table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarize all rows departing `city`.
    pub fn city_stats(df: &DataFrame, city: &str) -> Result<CityStats, QueryError> {
        require_columns(df, &[COL_CITY1, COL_CITY2, COL_LOAD_FACTOR])?;

        let filtered = df
            .clone()
            .lazy()
            .filter(col(COL_CITY1).eq(lit(city)))
            .collect()?;

        let total_trips = filtered.height();
        let avg_load_factor = filtered
            .column(COL_LOAD_FACTOR)?
            .as_materialized_series()
            .mean()
            .unwrap_or(f64::NAN);
        let most_traveled_to = Self::mode_destination(&filtered)?;

        Ok(CityStats {
            city: city.to_string(),
            total_trips,
            avg_load_factor,
            most_traveled_to,
        })
    }

    /// Summaries for every distinct origin city, computed in parallel,
    /// ordered by city name.
    pub fn all_city_stats(df: &DataFrame) -> Result<Vec<CityStats>, QueryError> {
        require_columns(df, &[COL_CITY1, COL_CITY2, COL_LOAD_FACTOR])?;

        let unique = df.column(COL_CITY1)?.unique()?;
        let mut cities: Vec<String> = unique
            .as_materialized_series()
            .iter()
            .filter_map(|v| {
                if v.is_null() {
                    None
                } else {
                    Some(v.to_string().trim_matches('"').to_string())
                }
            })
            .collect();
        cities.sort();

        cities
            .par_iter()
            .map(|city| Self::city_stats(df, city))
            .collect()
    }

    /// Most frequent destination in an already-filtered table. Ties resolve
    /// to the lexicographically smallest destination so the result never
    /// depends on row order.
    fn mode_destination(filtered: &DataFrame) -> Result<String, QueryError> {
        let destinations = filtered.column(COL_CITY2)?.str()?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for city in destinations.into_iter().flatten() {
            *counts.entry(city).or_insert(0) += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for (city, count) in counts {
            best = match best {
                Some((b_city, b_count)) if count < b_count || (count == b_count && city > b_city) => {
                    Some((b_city, b_count))
                }
                _ => Some((city, count)),
            };
        }

        Ok(best
            .map(|(city, _)| city.to_string())
            .unwrap_or_else(|| NO_DATA.to_string()))
    }

    /// Pearson correlation coefficient over row pairs where both values are
    /// present and finite. NaN when fewer than two usable pairs remain or
    /// either column has zero variance.
    pub fn pearson(df: &DataFrame, column_a: &str, column_b: &str) -> Result<f64, QueryError> {
        require_columns(df, &[column_a, column_b])?;

        let a = df.column(column_a)?.cast(&DataType::Float64)?;
        let a = a.f64()?;
        let b = df.column(column_b)?.cast(&DataType::Float64)?;
        let b = b.f64()?;

        let pairs: Vec<(f64, f64)> = a
            .into_iter()
            .zip(b)
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
                _ => None,
            })
            .collect();

        if pairs.len() < 2 {
            return Ok(f64::NAN);
        }

        let n = pairs.len() as f64;
        let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_a;
            let dy = y - mean_b;
            cov += dx * dy;
            var_a += dx * dx;
            var_b += dy * dy;
        }

        let denom = (var_a * var_b).sqrt();
        if denom == 0.0 {
            return Ok(f64::NAN);
        }

        Ok((cov / denom).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{COL_AIRCRAFT_TRIPS, COL_PASSENGER_TRIPS};

    fn fixture() -> DataFrame {
        df![
            COL_CITY1 => ["Adelaide", "Adelaide", "Adelaide", "Sydney"],
            COL_CITY2 => ["Brisbane", "Sydney", "Brisbane", "Melbourne"],
            COL_PASSENGER_TRIPS => [1200i64, 3400, 150, 9100],
            COL_AIRCRAFT_TRIPS => [30i64, 42, 5, 80],
            COL_LOAD_FACTOR => [80.0f64, 70.0, 60.0, 90.2],
        ]
        .unwrap()
    }

    #[test]
    fn city_stats_counts_and_averages() {
        let df = fixture();
        let stats = StatsCalculator::city_stats(&df, "Adelaide").unwrap();
        assert_eq!(stats.total_trips, 3);
        assert!((stats.avg_load_factor - 70.0).abs() < 1e-9);
        assert_eq!(stats.most_traveled_to, "Brisbane");
    }

    #[test]
    fn city_stats_single_row_average_is_exact() {
        let df = fixture();
        let stats = StatsCalculator::city_stats(&df, "Sydney").unwrap();
        assert_eq!(stats.total_trips, 1);
        assert!((stats.avg_load_factor - 90.2).abs() < f64::EPSILON);
        assert_eq!(stats.most_traveled_to, "Melbourne");
    }

    #[test]
    fn city_stats_unknown_city_is_empty_not_error() {
        let df = fixture();
        let stats = StatsCalculator::city_stats(&df, "Perth").unwrap();
        assert_eq!(stats.total_trips, 0);
        assert!(stats.avg_load_factor.is_nan());
        assert_eq!(stats.most_traveled_to, NO_DATA);
    }

    #[test]
    fn city_stats_missing_column_is_schema_error() {
        let df = fixture().drop(COL_LOAD_FACTOR).unwrap();
        let err = StatsCalculator::city_stats(&df, "Adelaide").unwrap_err();
        assert!(matches!(err, QueryError::InvalidSchema(c) if c == COL_LOAD_FACTOR));
    }

    #[test]
    fn mode_tie_breaks_to_lexicographically_smallest() {
        let df = df![
            COL_CITY1 => ["Hobart", "Hobart"],
            COL_CITY2 => ["Sydney", "Melbourne"],
            COL_LOAD_FACTOR => [50.0f64, 60.0],
        ]
        .unwrap();
        let stats = StatsCalculator::city_stats(&df, "Hobart").unwrap();
        assert_eq!(stats.most_traveled_to, "Melbourne");
    }

    #[test]
    fn all_city_stats_covers_every_origin_in_order() {
        let df = fixture();
        let all = StatsCalculator::all_city_stats(&df).unwrap();
        let cities: Vec<&str> = all.iter().map(|s| s.city.as_str()).collect();
        assert_eq!(cities, vec!["Adelaide", "Sydney"]);
    }

    #[test]
    fn pearson_perfect_positive_correlation() {
        let df = df![
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [10.0f64, 20.0, 30.0, 40.0],
        ]
        .unwrap();
        let r = StatsCalculator::pearson(&df, "a", "b").unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_perfect_negative_correlation() {
        let df = df![
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [8.0f64, 6.0, 4.0, 2.0],
        ]
        .unwrap();
        let r = StatsCalculator::pearson(&df, "a", "b").unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_near_zero_on_uncorrelated_data() {
        let df = df![
            "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            "b" => [3.0f64, -1.0, 4.0, -3.0, 2.0, -4.0, 1.0, -2.0],
        ]
        .unwrap();
        let r = StatsCalculator::pearson(&df, "a", "b").unwrap();
        assert!(r.abs() < 0.5, "expected weak correlation, got {r}");
    }

    #[test]
    fn pearson_zero_variance_is_nan() {
        let df = df![
            "a" => [5.0f64, 5.0, 5.0],
            "b" => [1.0f64, 2.0, 3.0],
        ]
        .unwrap();
        let r = StatsCalculator::pearson(&df, "a", "b").unwrap();
        assert!(r.is_nan());
    }

    #[test]
    fn pearson_missing_column_is_schema_error() {
        let df = fixture();
        let err = StatsCalculator::pearson(&df, COL_LOAD_FACTOR, "Freight_Tonnes").unwrap_err();
        assert!(matches!(err, QueryError::InvalidSchema(c) if c == "Freight_Tonnes"));
    }
}
