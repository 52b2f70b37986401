//! Pure reductions over a sample set
//!
//! Empty input follows the usual numeric conventions: `sum` is 0, every
//! other reduction is NaN. A NaN sample propagates through every reduction.
//! NaN is never special-cased downstream; it is serialized as JSON `null`.

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

fn has_nan(values: &[f64]) -> bool {
    values.iter().any(|v| v.is_nan())
}

pub fn min(values: &[f64]) -> f64 {
    if has_nan(values) {
        return f64::NAN;
    }
    values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

pub fn max(values: &[f64]) -> f64 {
    if has_nan(values) {
        return f64::NAN;
    }
    values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

/// Median, averaging the two middle values for even-sized input
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() || has_nan(values) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (divisor N)
pub fn std_population(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Round to `digits` decimal places, half away from zero.
///
/// Exact decimal ties therefore go up in magnitude (`0.125` to 2 places is
/// `0.13`), where a decimal quantize with banker's rounding would give `0.12`.
///
/// Non-finite values pass through unchanged, as do values whose scaled form
/// would overflow.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || !factor.is_finite() {
        return value;
    }
    scaled.round() / factor
}
