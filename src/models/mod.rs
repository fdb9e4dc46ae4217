//! Domain value types.

pub mod params;

pub use params::{ForecastParams, MAX_PERIODS, MIN_PERIODS};
