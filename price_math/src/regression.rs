//! Least-squares trend estimation over index position

/// Ordinary least-squares slope of `values` regressed against their
/// position index `0, 1, 2, ...`.
///
/// The x axis is the index, not elapsed time: gaps or repeated dates in
/// the underlying series are not compensated for.
///
/// Returns `0.0` when fewer than two values are given or when the index
/// variance is zero.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let x_mean = (0..n).map(|i| i as f64).sum::<f64>() / n_f;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        return 0.0;
    }

    numerator / denominator
}
