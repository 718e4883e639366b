//! Descriptive statistics and rounding

use crate::{MathError, Result};

/// Arithmetic mean of `values`.
///
/// Computed as a left-to-right sum divided by the count. An empty slice
/// has no mean and is reported as `InsufficientData` rather than `NaN`.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty set of prices".to_string(),
        ));
    }

    let value = values.iter().sum::<f64>() / values.len() as f64;
    if !value.is_finite() {
        return Err(MathError::CalculationError(format!(
            "Mean is not finite: {}",
            value
        )));
    }

    Ok(value)
}

/// Round `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
