//! Stats module - per-city summaries and correlation

mod calculator;

pub use calculator::{CityStats, StatsCalculator, NO_DATA};
