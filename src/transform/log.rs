//! Log-domain revenue transform.
//!
//! Revenue is modelled as `ln(revenue + 1)`, which keeps zero-revenue months
//! finite. The inverse is clamped so projected revenue is never negative.

/// Forward transform: `ln(revenue + 1)`.
pub fn log_revenue(revenue: f64) -> f64 {
    revenue.ln_1p()
}

/// Inverse transform: `max(0, exp(value) - 1)`.
pub fn inv_log_revenue(value: f64) -> f64 {
    value.exp_m1().max(0.0)
}

/// Apply [`log_revenue`] to a series.
pub fn log_series(series: &[f64]) -> Vec<f64> {
    series.iter().map(|&r| log_revenue(r)).collect()
}

/// Apply [`inv_log_revenue`] to a series.
pub fn inv_log_series(transformed: &[f64]) -> Vec<f64> {
    transformed.iter().map(|&v| inv_log_revenue(v)).collect()
}
