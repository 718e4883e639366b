//! Seasonal-adjusted linear trend model.
//!
//! The forecast for a day `d` is
//!
//! ```text
//! max(0, last_price + slope * days_ahead(d) + seasonal(d))
//! ```
//!
//! where `slope` is the least-squares slope of the most recent prices
//! against their position, `days_ahead(d)` counts whole days from the last
//! observation to `d`, and `seasonal(d)` is the mean price of every
//! observation sharing `d`'s day of year minus a baseline average of recent
//! prices (zero when no such observation exists).

use crate::config::ForecastConfig;
use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::models::{
    recommend, Baseline, BaselineSource, ForecastModel, ForecastPoint, ForecastResult,
    TrainedForecastModel,
};
use crate::utils::{day_of_year, days_between, window_dates};
use chrono::{Days, NaiveDate};
use price_math::{mean, ols_slope, round_to};
use std::collections::HashMap;
use tracing::debug;

const MODEL_NAME: &str = "Seasonal Trend";
const PRICE_DECIMALS: u32 = 2;

/// Seasonal-adjusted linear trend model
#[derive(Debug, Clone)]
pub struct SeasonalTrendModel {
    /// Name of the model
    name: String,
    /// Window sizes and thresholds
    config: ForecastConfig,
}

/// Trained seasonal-adjusted linear trend model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    /// Name of the model
    name: String,
    /// Window sizes and thresholds
    config: ForecastConfig,
    /// Historical data, sorted by date
    series: HistoricalSeries,
    /// Trend in price per observation
    slope: f64,
    /// Date of the last observation
    last_date: NaiveDate,
    /// Price of the last observation
    last_price: f64,
    /// Same-day-of-year price statistics
    profile: SeasonalProfile,
}

/// Mean historical price per day of year, across all years of a series
#[derive(Debug, Clone, Default)]
pub struct SeasonalProfile {
    /// Day of year -> (sum of prices, count)
    by_day: HashMap<u32, (f64, usize)>,
}

impl SeasonalProfile {
    /// Accumulate prices by day of year in series order
    pub fn from_series(series: &HistoricalSeries) -> Self {
        let mut by_day: HashMap<u32, (f64, usize)> = HashMap::new();
        for o in series.observations() {
            let entry = by_day.entry(day_of_year(o.date)).or_insert((0.0, 0));
            entry.0 += o.price;
            entry.1 += 1;
        }

        Self { by_day }
    }

    /// Mean price of observations on the given day of year, if any
    pub fn day_mean(&self, day: u32) -> Option<f64> {
        self.by_day
            .get(&day)
            .map(|&(sum, count)| sum / count as f64)
    }

    /// Offset of the same-day-of-year mean from `baseline_average`,
    /// or `0.0` when the series never saw that day of year
    pub fn adjustment(&self, date: NaiveDate, baseline_average: f64) -> f64 {
        match self.day_mean(day_of_year(date)) {
            Some(day_mean) => day_mean - baseline_average,
            None => 0.0,
        }
    }
}

/// Compute the baseline average for a target date.
///
/// Uses the observations dated within the `baseline_days` days before
/// `target` (the target itself excluded). When fewer than
/// `min_baseline_points` fall in that window, the last `fallback_points`
/// observations of the series are averaged instead.
pub fn baseline(
    series: &HistoricalSeries,
    target: NaiveDate,
    config: &ForecastConfig,
) -> Result<Baseline> {
    if series.is_empty() {
        return Err(ForecastError::no_data(series.crop(), series.location()));
    }

    let window_end = target.checked_sub_days(Days::new(1));
    let window_start = target.checked_sub_days(Days::new(u64::from(config.baseline_days)));
    let (window_start, window_end) = match (window_start, window_end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(ForecastError::InvalidInput(format!(
                "Target date {} is too early for a {} day baseline",
                target, config.baseline_days
            )))
        }
    };

    let recent: Vec<f64> = series
        .observations()
        .iter()
        .filter(|o| o.date >= window_start && o.date <= window_end)
        .map(|o| o.price)
        .collect();

    let (prices, source) = if recent.is_empty() || recent.len() < config.min_baseline_points {
        let observations = series.observations();
        let skip = observations.len().saturating_sub(config.fallback_points);
        let tail: Vec<f64> = observations[skip..].iter().map(|o| o.price).collect();
        (tail, BaselineSource::LastObservations)
    } else {
        (recent, BaselineSource::RecentWindow)
    };

    Ok(Baseline {
        average: mean(&prices)?,
        len: prices.len(),
        source,
    })
}

/// Forecast `target` from `series` with the default configuration.
///
/// An empty series is reported as [`ForecastError::NoData`].
pub fn forecast(series: &HistoricalSeries, target: NaiveDate) -> Result<ForecastResult> {
    SeasonalTrendModel::default().train(series)?.forecast(target)
}

impl SeasonalTrendModel {
    /// Create a new model with the given configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: MODEL_NAME.to_string(),
            config,
        })
    }

    /// Get the model configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

impl Default for SeasonalTrendModel {
    fn default() -> Self {
        Self {
            name: MODEL_NAME.to_string(),
            config: ForecastConfig::default(),
        }
    }
}

impl ForecastModel for SeasonalTrendModel {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, series: &HistoricalSeries) -> Result<Self::Trained> {
        let last = series
            .last()
            .ok_or_else(|| ForecastError::no_data(series.crop(), series.location()))?;

        let prices = series.prices();
        let trend_start = prices.len().saturating_sub(self.config.trend_points);
        let slope = ols_slope(&prices[trend_start..]);
        if !slope.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "Trend slope is not finite: {}",
                slope
            )));
        }

        Ok(TrainedSeasonalTrend {
            name: self.name.clone(),
            config: self.config,
            series: series.clone(),
            slope,
            last_date: last.date,
            last_price: last.price,
            profile: SeasonalProfile::from_series(series),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalTrend {
    /// Get the fitted trend slope
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the same-day-of-year statistics
    pub fn profile(&self) -> &SeasonalProfile {
        &self.profile
    }

    /// Unrounded, non-negative prediction for `date`
    fn predict_day(&self, date: NaiveDate, baseline_average: f64) -> Result<f64> {
        let days_ahead = days_between(self.last_date, date) as f64;
        let seasonal = self.profile.adjustment(date, baseline_average);
        let price = self.last_price + self.slope * days_ahead + seasonal;

        if !price.is_finite() {
            return Err(ForecastError::ComputationError(format!(
                "Predicted price for {} is not finite: {}",
                date, price
            )));
        }

        Ok(price.max(0.0))
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast(&self, target: NaiveDate) -> Result<ForecastResult> {
        let baseline = baseline(&self.series, target, &self.config)?;

        let window = window_dates(target, self.config.window_days)?
            .into_iter()
            .map(|date| -> Result<ForecastPoint> {
                let predicted = round_to(self.predict_day(date, baseline.average)?, PRICE_DECIMALS);
                Ok(ForecastPoint { date, predicted })
            })
            .collect::<Result<Vec<_>>>()?;

        let predicted_price = round_to(self.predict_day(target, baseline.average)?, PRICE_DECIMALS);

        let recommended_date = recommend(&window)
            .map(|p| p.date)
            .ok_or_else(|| ForecastError::ComputationError("Forecast window is empty".to_string()))?;

        let days_ahead = days_between(self.last_date, target);

        debug!(
            crop = self.series.crop(),
            location = self.series.location(),
            %target,
            slope = self.slope,
            baseline_average = baseline.average,
            baseline_len = baseline.len,
            baseline_source = ?baseline.source,
            days_ahead,
            predicted_price,
            %recommended_date,
            "Seasonal trend forecast"
        );

        Ok(ForecastResult {
            requested_date: target,
            predicted_price,
            recommended_date,
            window,
            slope: self.slope,
            baseline,
            days_ahead,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(start: NaiveDate, prices: &[f64]) -> HistoricalSeries {
        let points: Vec<(NaiveDate, f64)> = start
            .iter_days()
            .zip(prices.iter().copied())
            .collect();
        HistoricalSeries::from_prices("Onion", "Nashik", &points).unwrap()
    }

    #[test]
    fn test_baseline_uses_recent_window() {
        let prices: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);

        // Target 2024-03-01 (index 60): window covers indices 30..=59
        let b = baseline(&series, date(2024, 3, 1), &ForecastConfig::default()).unwrap();
        assert_eq!(b.source, BaselineSource::RecentWindow);
        assert_eq!(b.len, 30);
        assert_abs_diff_eq!(b.average, 44.5, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_excludes_target_day() {
        let prices = vec![10.0; 20];
        let mut series_prices = prices.clone();
        series_prices.push(1000.0);
        let series = daily_series(date(2024, 1, 1), &series_prices);

        // The 1000.0 sits on the target date itself
        let b = baseline(&series, date(2024, 1, 21), &ForecastConfig::default()).unwrap();
        assert_eq!(b.source, BaselineSource::RecentWindow);
        assert_eq!(b.len, 20);
        assert_abs_diff_eq!(b.average, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_fallback_when_sparse() {
        let prices: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);

        // Long after the data ends: nothing in the recent window
        let b = baseline(&series, date(2024, 6, 1), &ForecastConfig::default()).unwrap();
        assert_eq!(b.source, BaselineSource::LastObservations);
        assert_eq!(b.len, 30);
        // mean of 10..=39
        assert_abs_diff_eq!(b.average, 24.5, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_threshold_boundary() {
        // Daily 2024-01-01..=2024-02-09, price equal to the index
        let prices: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);
        let config = ForecastConfig::default();

        // Window 2024-01-31..=2024-02-29 holds exactly 10 observations
        let b = baseline(&series, date(2024, 3, 1), &config).unwrap();
        assert_eq!(b.source, BaselineSource::RecentWindow);
        assert_eq!(b.len, 10);
        assert_abs_diff_eq!(b.average, 34.5, epsilon = 1e-12);

        // One day later the window holds 9 and the last 30 are used
        let b = baseline(&series, date(2024, 3, 2), &config).unwrap();
        assert_eq!(b.source, BaselineSource::LastObservations);
        assert_eq!(b.len, 30);
        assert_abs_diff_eq!(b.average, 24.5, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_empty_window_always_falls_back() {
        let prices: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);
        let config = ForecastConfig {
            min_baseline_points: 0,
            ..ForecastConfig::default()
        };

        let b = baseline(&series, date(2024, 6, 1), &config).unwrap();
        assert_eq!(b.source, BaselineSource::LastObservations);
        assert_eq!(b.len, 30);
    }

    #[test]
    fn test_baseline_fallback_short_series() {
        let series = daily_series(date(2024, 1, 1), &[4.0, 6.0, 8.0]);
        let b = baseline(&series, date(2024, 1, 4), &ForecastConfig::default()).unwrap();
        assert_eq!(b.source, BaselineSource::LastObservations);
        assert_eq!(b.len, 3);
        assert_abs_diff_eq!(b.average, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_empty_series() {
        let series = HistoricalSeries::new("Onion", "Nashik", Vec::new());
        let result = baseline(&series, date(2024, 1, 1), &ForecastConfig::default());
        assert!(matches!(result, Err(ForecastError::NoData { .. })));
    }

    #[test]
    fn test_seasonal_profile() {
        let points = vec![
            (date(2022, 7, 19), 110.0),
            (date(2023, 7, 19), 130.0),
            (date(2023, 7, 20), 90.0),
        ];
        let series = HistoricalSeries::from_prices("Onion", "Nashik", &points).unwrap();
        let profile = SeasonalProfile::from_series(&series);

        // 2022-07-19 and 2023-07-19 are both day 200
        assert_abs_diff_eq!(profile.day_mean(200).unwrap(), 120.0, epsilon = 1e-12);
        assert_abs_diff_eq!(profile.adjustment(date(2025, 7, 19), 100.0), 20.0, epsilon = 1e-12);
        assert_eq!(profile.adjustment(date(2025, 1, 1), 100.0), 0.0);
    }

    #[test]
    fn test_train_empty_series_is_no_data() {
        let series = HistoricalSeries::new("Onion", "Nashik", Vec::new());
        let result = SeasonalTrendModel::default().train(&series);
        assert!(matches!(result, Err(ForecastError::NoData { .. })));
    }

    #[test]
    fn test_single_observation() {
        let series = daily_series(date(2024, 5, 1), &[250.0]);
        let result = forecast(&series, date(2024, 5, 10)).unwrap();

        assert_eq!(result.slope(), 0.0);
        assert_eq!(result.predicted_price(), 250.0);
        assert!(result.window().iter().all(|p| p.predicted == 250.0));
        assert_eq!(result.recommended_date(), date(2024, 5, 10));
    }

    #[test]
    fn test_negative_prediction_is_floored() {
        // Steep downward trend
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - 5.0 * i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);
        let result = forecast(&series, date(2024, 3, 1)).unwrap();

        assert_eq!(result.predicted_price(), 0.0);
        assert!(result.window().iter().all(|p| p.predicted == 0.0));
        assert_eq!(result.recommended_date(), date(2024, 3, 1));
    }

    #[test]
    fn test_backward_extrapolation() {
        let prices: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let series = daily_series(date(2024, 1, 1), &prices);

        // Two days before the last observation (2024-01-10 at 59.0)
        let result = forecast(&series, date(2024, 1, 8)).unwrap();
        assert_eq!(result.days_ahead(), -2);
        assert_abs_diff_eq!(result.slope(), 1.0, epsilon = 1e-9);

        // Only 7 points precede the target, so all 10 are averaged: 54.5.
        // 2024-01-08 itself was observed at 57.0, giving a +2.5 adjustment.
        assert_eq!(result.baseline().source, BaselineSource::LastObservations);
        assert_eq!(result.predicted_price(), 59.5);
    }

    #[test]
    fn test_custom_window_length() {
        let config = ForecastConfig::default().with_window_days(3);
        let model = SeasonalTrendModel::new(config).unwrap();
        let series = daily_series(date(2024, 1, 1), &[10.0, 11.0, 12.0]);
        let result = model.train(&series).unwrap().forecast(date(2024, 2, 1)).unwrap();
        assert_eq!(result.window().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ForecastConfig::default().with_trend_points(0);
        assert!(SeasonalTrendModel::new(config).is_err());

        let config = ForecastConfig::default().with_min_baseline_points(0);
        assert!(matches!(
            SeasonalTrendModel::new(config),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
