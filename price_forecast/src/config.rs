//! Forecaster configuration

use crate::error::{ForecastError, Result};
use std::str::FromStr;

/// Environment variable overriding [`ForecastConfig::baseline_days`]
pub const ENV_BASELINE_DAYS: &str = "CROP_FORECAST_BASELINE_DAYS";
/// Environment variable overriding [`ForecastConfig::min_baseline_points`]
pub const ENV_MIN_BASELINE_POINTS: &str = "CROP_FORECAST_MIN_BASELINE_POINTS";
/// Environment variable overriding [`ForecastConfig::fallback_points`]
pub const ENV_FALLBACK_POINTS: &str = "CROP_FORECAST_FALLBACK_POINTS";
/// Environment variable overriding [`ForecastConfig::trend_points`]
pub const ENV_TREND_POINTS: &str = "CROP_FORECAST_TREND_POINTS";
/// Environment variable overriding [`ForecastConfig::window_days`]
pub const ENV_WINDOW_DAYS: &str = "CROP_FORECAST_WINDOW_DAYS";

/// Tunables of the seasonal-trend forecaster.
///
/// The defaults reproduce the reference behaviour: a 30 day baseline
/// window needing at least 10 observations, a fallback to the last 30
/// observations, a trend fitted over the last 90 observations and a
/// 7 day forecast window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Length in days of the window immediately preceding the target date
    pub baseline_days: u32,
    /// Minimum observations inside the baseline window before falling back
    pub min_baseline_points: usize,
    /// Number of trailing observations used when the window is too sparse
    pub fallback_points: usize,
    /// Number of trailing observations the trend slope is fitted over
    pub trend_points: usize,
    /// Number of consecutive days in the forecast window
    pub window_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            baseline_days: 30,
            min_baseline_points: 10,
            fallback_points: 30,
            trend_points: 90,
            window_days: 7,
        }
    }
}

impl ForecastConfig {
    /// Build a configuration from the defaults overridden by any
    /// `CROP_FORECAST_*` environment variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ForecastConfig::from_env`] with an explicit variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            baseline_days: read_var(&lookup, ENV_BASELINE_DAYS, defaults.baseline_days)?,
            min_baseline_points: read_var(
                &lookup,
                ENV_MIN_BASELINE_POINTS,
                defaults.min_baseline_points,
            )?,
            fallback_points: read_var(&lookup, ENV_FALLBACK_POINTS, defaults.fallback_points)?,
            trend_points: read_var(&lookup, ENV_TREND_POINTS, defaults.trend_points)?,
            window_days: read_var(&lookup, ENV_WINDOW_DAYS, defaults.window_days)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_baseline_days(mut self, days: u32) -> Self {
        self.baseline_days = days;
        self
    }

    pub fn with_min_baseline_points(mut self, points: usize) -> Self {
        self.min_baseline_points = points;
        self
    }

    pub fn with_fallback_points(mut self, points: usize) -> Self {
        self.fallback_points = points;
        self
    }

    pub fn with_trend_points(mut self, points: usize) -> Self {
        self.trend_points = points;
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Check that every window and count is positive
    pub fn validate(&self) -> Result<()> {
        if self.baseline_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Baseline window must span at least one day".to_string(),
            ));
        }
        if self.min_baseline_points == 0 {
            return Err(ForecastError::InvalidParameter(
                "Baseline window must require at least one observation".to_string(),
            ));
        }
        if self.fallback_points == 0 {
            return Err(ForecastError::InvalidParameter(
                "Fallback baseline must use at least one observation".to_string(),
            ));
        }
        if self.trend_points == 0 {
            return Err(ForecastError::InvalidParameter(
                "Trend must be fitted over at least one observation".to_string(),
            ));
        }
        if self.window_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast window must contain at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            ForecastError::InvalidParameter(format!("{} = '{}': {}", key, raw, e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.baseline_days, 30);
        assert_eq!(config.min_baseline_points, 10);
        assert_eq!(config.fallback_points, 30);
        assert_eq!(config.trend_points, 90);
        assert_eq!(config.window_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let config =
            ForecastConfig::from_lookup(lookup_from(&[(ENV_WINDOW_DAYS, "14"), (ENV_TREND_POINTS, " 60 ")]))
                .unwrap();
        assert_eq!(config.window_days, 14);
        assert_eq!(config.trend_points, 60);
        assert_eq!(config.baseline_days, 30);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let result = ForecastConfig::from_lookup(lookup_from(&[(ENV_BASELINE_DAYS, "thirty")]));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_lookup_rejects_zero_window() {
        let result = ForecastConfig::from_lookup(lookup_from(&[(ENV_WINDOW_DAYS, "0")]));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_lookup_rejects_zero_min_baseline_points() {
        let result = ForecastConfig::from_lookup(lookup_from(&[(ENV_MIN_BASELINE_POINTS, "0")]));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
        assert!(ForecastConfig::default()
            .with_min_baseline_points(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_builder() {
        let config = ForecastConfig::default()
            .with_baseline_days(14)
            .with_min_baseline_points(3)
            .with_fallback_points(5);
        assert_eq!(config.baseline_days, 14);
        assert_eq!(config.min_baseline_points, 3);
        assert_eq!(config.fallback_points, 5);
    }
}
