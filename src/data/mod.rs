//! Data module - CSV loading and cleaning of the city-pair table

mod loader;

pub use loader::{load_city_pairs, LoaderError};

/// Default input path when no override is given.
pub const DEFAULT_DATA_PATH: &str = "dom_city_pair.csv";

/// Origin city, title-cased on load.
pub const COL_CITY1: &str = "City1";
/// Destination city, title-cased on load.
pub const COL_CITY2: &str = "City2";
/// Raw month column, formatted `Mon-YY` (e.g. `Jan-20`).
pub const COL_MONTH: &str = "Month";
/// Date column derived from [`COL_MONTH`], first day of the month.
pub const COL_DATE: &str = "Date";
pub const COL_PASSENGER_TRIPS: &str = "Passenger_Trips";
pub const COL_AIRCRAFT_TRIPS: &str = "Aircraft_Trips";
pub const COL_LOAD_FACTOR: &str = "Passenger_Load_Factor";
pub const COL_DISTANCE_KM: &str = "Distance_GC_(km)";

/// Columns every input file must carry. Extra columns pass through untouched.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_CITY1,
    COL_CITY2,
    COL_MONTH,
    COL_PASSENGER_TRIPS,
    COL_AIRCRAFT_TRIPS,
    COL_LOAD_FACTOR,
    COL_DISTANCE_KM,
];
