//! Utility functions for the price_forecast crate

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Date formats accepted from callers, tried in order
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"];

/// Parse a calendar date from user input.
///
/// ISO-8601 `YYYY-MM-DD` is tried first, then `DD/MM/YYYY`, `DD-MM-YYYY`
/// and finally `MM/DD/YYYY`. Ambiguous inputs such as `03/04/2025`
/// therefore resolve day-first.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ForecastError::InvalidInput("date is empty".to_string()));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ForecastError::InvalidInput(format!("Invalid date format: {}", input)))
}

/// 1-based ordinal day within the date's calendar year (Jan 1 = 1)
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Whole days from `from` to `to`, negative when `to` is earlier
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// `count` consecutive dates starting at (and including) `start`
pub fn window_dates(start: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    (0..count)
        .map(|offset| {
            start
                .checked_add_days(Days::new(u64::from(offset)))
                .ok_or_else(|| {
                    ForecastError::InvalidInput(format!(
                        "Date {} + {} days is out of range",
                        start, offset
                    ))
                })
        })
        .collect()
}

/// Generate a synthetic daily price series for testing and demos.
///
/// Prices follow `base_price + daily_trend * i` plus Gaussian noise with
/// standard deviation `noise`, floored at zero. The same `seed` always
/// produces the same series.
#[allow(clippy::too_many_arguments)]
pub fn generate_price_series(
    crop: &str,
    location: &str,
    start: NaiveDate,
    days: usize,
    base_price: f64,
    daily_trend: f64,
    noise: f64,
    seed: u64,
) -> Result<Vec<Observation>> {
    let normal = Normal::new(0.0, noise)
        .map_err(|e| ForecastError::InvalidParameter(format!("Invalid noise level: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut data = Vec::with_capacity(days);
    for (i, date) in start.iter_days().take(days).enumerate() {
        let price = (base_price + daily_trend * i as f64 + normal.sample(&mut rng)).max(0.0);
        data.push(Observation::new(date, crop, location, price)?);
    }

    Ok(data)
}
