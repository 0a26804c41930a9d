//! Statistical utility functions.

use crate::error::{ChangepointError, Result};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population variance of a slice (n denominator).
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / values.len() as f64
}

/// Prefix sums of `f(x)` over `values`.
///
/// The result has length `values.len() + 1` and starts with `0.0`, so the sum
/// over `values[start..end]` is `out[end] - out[start]`.
pub fn cumulative_sum<F>(values: &[f64], f: F) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(0.0);
    let mut acc = 0.0;
    for &x in values {
        acc += f(x);
        out.push(acc);
    }
    out
}

/// Reject empty input and NaN/infinite samples.
pub fn validate_finite(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(ChangepointError::EmptyData);
    }
    match values.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(ChangepointError::NonFiniteValue { index }),
        None => Ok(()),
    }
}
