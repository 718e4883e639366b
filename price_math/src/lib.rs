//! # Price Math
//!
//! Small numeric building blocks used by the crop price forecaster.
//! Everything here works on plain `f64` slices so it can be tested without
//! any notion of dates, crops or locations.

use thiserror::Error;

pub mod regression;
pub mod stats;

pub use regression::ols_slope;
pub use stats::{mean, round_to};

/// Errors that can occur in price calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;
