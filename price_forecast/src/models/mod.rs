//! Forecasting models for crop price series

use crate::data::HistoricalSeries;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod seasonal_trend;

pub use seasonal_trend::{forecast, SeasonalTrendModel, TrainedSeasonalTrend};

/// Predicted price for a single day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast day
    pub date: NaiveDate,
    /// Predicted price, non-negative and rounded to 2 decimals
    pub predicted: f64,
}

/// Where the baseline average was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    /// Observations inside the window immediately preceding the target date
    RecentWindow,
    /// The chronologically last observations, used when the window is too sparse
    LastObservations,
}

/// Average price anchoring the seasonal adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Mean price of the baseline observations
    pub average: f64,
    /// Number of observations averaged
    pub len: usize,
    /// Which rule selected the observations
    pub source: BaselineSource,
}

/// Forecast for a requested date and the days following it
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub(crate) requested_date: NaiveDate,
    pub(crate) predicted_price: f64,
    pub(crate) recommended_date: NaiveDate,
    pub(crate) window: Vec<ForecastPoint>,
    pub(crate) slope: f64,
    pub(crate) baseline: Baseline,
    pub(crate) days_ahead: i64,
}

impl ForecastResult {
    /// Get the date the forecast was requested for
    pub fn requested_date(&self) -> NaiveDate {
        self.requested_date
    }

    /// Get the predicted price on the requested date, rounded to 2 decimals
    pub fn predicted_price(&self) -> f64 {
        self.predicted_price
    }

    /// Get the window date with the highest predicted price (earliest on ties)
    pub fn recommended_date(&self) -> NaiveDate {
        self.recommended_date
    }

    /// Get the consecutive daily forecasts starting at the requested date
    pub fn window(&self) -> &[ForecastPoint] {
        &self.window
    }

    /// Get the trend slope in price per observation
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the baseline used for the seasonal adjustment
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Get the whole days between the last observation and the requested date
    pub fn days_ahead(&self) -> i64 {
        self.days_ahead
    }
}

/// Pick the window entry with the highest predicted price.
///
/// The scan keeps the first entry unless a later one is strictly greater,
/// so ties resolve to the earliest date. Returns `None` for an empty window.
pub fn recommend(window: &[ForecastPoint]) -> Option<&ForecastPoint> {
    let (first, rest) = window.split_first()?;

    let mut best = first;
    for point in rest {
        if point.predicted > best.predicted {
            best = point;
        }
    }

    Some(best)
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast the requested date and the window that starts on it
    fn forecast(&self, target: NaiveDate) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a historical price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a price series
    fn train(&self, series: &HistoricalSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, predicted: f64) -> ForecastPoint {
        ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
            predicted,
        }
    }

    #[test]
    fn test_recommend_picks_maximum() {
        let window = vec![point(1, 10.0), point(2, 12.5), point(3, 11.0)];
        assert_eq!(recommend(&window).unwrap().date, window[1].date);
    }

    #[test]
    fn test_recommend_ties_pick_earliest() {
        let window = vec![point(1, 10.0), point(2, 12.0), point(3, 12.0), point(4, 9.0)];
        assert_eq!(recommend(&window).unwrap().date, window[1].date);

        let flat = vec![point(1, 5.0), point(2, 5.0), point(3, 5.0)];
        assert_eq!(recommend(&flat).unwrap().date, flat[0].date);
    }

    #[test]
    fn test_recommend_empty() {
        assert!(recommend(&[]).is_none());
    }
}
