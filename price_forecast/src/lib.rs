//! # Price Forecast
//!
//! Short-term crop price forecasting from historical market records.
//!
//! ## Features
//!
//! - Historical price records per crop and market location
//! - A load-once, read-only price table fed from CSV files
//! - A seasonal-adjusted linear trend model producing a point forecast, a
//!   7 day forecast window and the best day to sell within it
//! - The request/response contract of a prediction endpoint
//!
//! ## Model
//!
//! For a target date the model averages recent prices into a baseline,
//! fits a least-squares trend over the last 90 observations and adds the
//! offset between the historical same-day-of-year price and the baseline.
//! The prediction is anchored on the last observed price and never
//! negative.
//!
//! ## Quick Start
//!
//! ```no_run
//! use price_forecast::data::PriceTable;
//! use price_forecast::request::{predict, PredictRequest};
//!
//! // Load data once at startup
//! let table = PriceTable::from_csv("sample_prices.csv")?;
//!
//! // Answer a query
//! let request = PredictRequest::new("Sugarcane", "DistrictA", "2025-08-15");
//! let response = predict(&table, &request)?;
//! println!("{}", response.to_json()?);
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod request;
pub mod utils;

// Re-export commonly used types
pub use crate::config::ForecastConfig;
pub use crate::data::{HistoricalSeries, Observation, PriceTable};
pub use crate::error::ForecastError;
pub use crate::models::{forecast, ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel};
pub use crate::request::{predict, PredictRequest, PredictResponse};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
