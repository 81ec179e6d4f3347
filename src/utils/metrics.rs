//! In-sample quality metrics for a fitted regression.

use crate::core::TrainingMetrics;
use crate::transform::inv_log_revenue;
use crate::utils::solver::{ModelCoefficients, WeightedObservation};

/// Lowest confidence ever reported.
pub const CONFIDENCE_FLOOR: f64 = 0.45;
/// Highest confidence ever reported.
pub const CONFIDENCE_CEILING: f64 = 0.92;

/// Mean Absolute Percentage Error, in percent.
///
/// Months with zero actual revenue are skipped. Returns 0 when no month has
/// positive revenue.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    let (sum, count) = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, _)| **a > 0.0)
        .fold((0.0, 0usize), |(sum, count), (a, p)| {
            (sum + ((a - p) / a).abs(), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        100.0 * sum / count as f64
    }
}

/// Weighted RMS of residuals: `sqrt(Σ w·r² / Σ w)`.
pub fn weighted_rms(residuals: &[f64], weights: &[f64]) -> f64 {
    let (num, den) = residuals
        .iter()
        .zip(weights.iter())
        .fold((0.0, 0.0), |(num, den), (r, w)| (num + w * r * r, den + w));

    if den > 0.0 {
        (num / den).sqrt()
    } else {
        0.0
    }
}

/// `clamp(1 − min(mape/120, 0.6), 0.45, 0.92)`.
pub fn confidence_from_mape(mape: f64) -> f64 {
    let penalty = if mape.is_nan() {
        0.6
    } else {
        (mape / 120.0).min(0.6)
    };
    (1.0 - penalty).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

/// In-sample revenue predicted for each observation.
pub fn fitted_revenue(
    coefficients: &ModelCoefficients,
    observations: &[WeightedObservation],
) -> Vec<f64> {
    observations
        .iter()
        .map(|o| inv_log_revenue(coefficients.predict_log(&o.features)))
        .collect()
}

/// Evaluate a fit against the observations it was trained on.
///
/// # Example
///
/// ```
/// use revenue_forecast::utils::metrics::evaluate_fit;
/// use revenue_forecast::utils::solver::{fit_weighted, WeightedObservation};
/// use revenue_forecast::features::FourierFeatures;
///
/// let builder = FourierFeatures::new(1, 12).unwrap();
/// let obs: Vec<_> = (0..12)
///     .map(|t| WeightedObservation::new(builder.build(t), 500.0, 1.0))
///     .collect();
/// let coef = fit_weighted(&obs, 1e-6).unwrap();
/// let metrics = evaluate_fit(&coef, &obs);
/// assert!(metrics.mape < 1e-3);
/// assert_eq!(metrics.confidence, 0.92);
/// ```
pub fn evaluate_fit(
    coefficients: &ModelCoefficients,
    observations: &[WeightedObservation],
) -> TrainingMetrics {
    let log_residuals: Vec<f64> = observations
        .iter()
        .map(|o| o.log_revenue - coefficients.predict_log(&o.features))
        .collect();
    let weights: Vec<f64> = observations.iter().map(|o| o.weight).collect();
    let actual: Vec<f64> = observations.iter().map(|o| o.revenue).collect();
    let predicted = fitted_revenue(coefficients, observations);

    let mape = mape(&actual, &predicted);
    TrainingMetrics {
        mape,
        residual_std: weighted_rms(&log_residuals, &weights),
        confidence: confidence_from_mape(mape),
    }
}
