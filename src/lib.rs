//! # Crop Price
//!
//! `crop_price` bundles the crop price forecasting crates of this workspace
//! behind one dependency.
//!
//! - [`forecast`]: price records, the price table, the seasonal trend model
//!   and the prediction request contract (`price_forecast`)
//! - [`math`]: means, trend slopes and rounding (`price_math`)
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use crop_price::forecast::HistoricalSeries;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let points: Vec<(NaiveDate, f64)> = start
//!     .iter_days()
//!     .take(90)
//!     .enumerate()
//!     .map(|(i, d)| (d, 100.0 + 0.5 * i as f64))
//!     .collect();
//! let series = HistoricalSeries::from_prices("Sugarcane", "DistrictA", &points).unwrap();
//!
//! let target = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let result = crop_price::forecast::forecast(&series, target).unwrap();
//! assert_eq!(result.predicted_price(), 145.0);
//! assert_eq!(result.window()[6].predicted, 148.0);
//! ```

pub use price_forecast as forecast;
pub use price_math as math;

pub use price_forecast::{
    predict, ForecastConfig, ForecastError, ForecastResult, HistoricalSeries, Observation,
    PredictRequest, PredictResponse, PriceTable,
};
