//! Citypair Insights - Australian Domestic Flight City-Pair Analysis
//!
//! Loads the BITRE domestic city-pair CSV, cleans it, and answers the fixed
//! analytical questions the dashboard reports are built from: city-pair
//! lookup, top-N rankings, per-city summaries, composite filtering, and a
//! distance/load-factor correlation.

pub mod data;
pub mod query;
pub mod report;
pub mod stats;

pub use data::{load_city_pairs, LoaderError};
pub use query::{FilterCriteria, FlightQuery, QueryError, SortOrder};
pub use stats::{CityStats, StatsCalculator};
