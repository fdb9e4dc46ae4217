//! Forecast window parameters.

use chrono::{Datelike, Duration, NaiveDate};

/// Smallest allowed forecast horizon, in weekly periods.
pub const MIN_PERIODS: u32 = 1;
/// Largest allowed forecast horizon, in weekly periods.
pub const MAX_PERIODS: u32 = 52;

/// User-editable forecast window: start date, horizon, optional customer.
///
/// The horizon is always clamped to `[MIN_PERIODS, MAX_PERIODS]` and an
/// empty-string customer is normalized to "no customer".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastParams {
    start_date: Option<NaiveDate>,
    periods: u32,
    customer: Option<String>,
}

impl ForecastParams {
    /// Parameters with no start date yet and the full-year horizon.
    pub fn new() -> Self {
        Self {
            start_date: None,
            periods: MAX_PERIODS,
            customer: None,
        }
    }

    /// Default window relative to the given clock date: forecasts start on
    /// the next upcoming Monday (a full week ahead when `today` is already
    /// a Monday).
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            start_date: Some(next_monday(today)),
            periods: MAX_PERIODS,
            customer: None,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = Some(date);
    }

    /// Set the horizon, clamped to the allowed range.
    pub fn set_periods(&mut self, periods: u32) {
        self.periods = periods.clamp(MIN_PERIODS, MAX_PERIODS);
    }

    /// Set or clear the customer filter. `Some("")` counts as no filter.
    pub fn set_customer(&mut self, customer: Option<String>) {
        self.customer = customer.filter(|c| !c.is_empty());
    }

    pub fn clear_customer(&mut self) {
        self.customer = None;
    }
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self::new()
    }
}

/// The next Monday strictly after `today`.
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let day_of_week = i64::from(today.weekday().num_days_from_sunday());
    let mut days_ahead = (1 - day_of_week).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    today + Duration::days(days_ahead)
}
