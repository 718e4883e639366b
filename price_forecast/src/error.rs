//! Error types for the price_forecast crate

use price_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Missing or malformed crop, location or date in a request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No historical observations for the requested crop/location pair
    #[error("No data for crop '{crop}' at location '{location}'")]
    NoData { crop: String, location: String },

    /// A numeric result was NaN or infinite
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// Error from invalid configuration parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to historical record validation
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading delimited price files
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ForecastError {
    /// Shorthand for the "no data" condition of a crop/location pair
    pub fn no_data(crop: &str, location: &str) -> Self {
        ForecastError::NoData {
            crop: crop.to_string(),
            location: location.to_string(),
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ComputationError(err.to_string())
    }
}
