//! Projection of fitted coefficients onto future months.

use crate::core::{months_between, ForecastPoint, ForecastRequest};
use crate::features::FourierFeatures;
use crate::transform::inv_log_revenue;
use crate::utils::metrics::{CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
use crate::utils::solver::ModelCoefficients;
use chrono::NaiveDate;
use tracing::warn;

/// Turns coefficients into revenue, order and confidence per target month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastGenerator {
    features: FourierFeatures,
    confidence_decay: f64,
}

impl ForecastGenerator {
    pub fn new(features: FourierFeatures, confidence_decay: f64) -> Self {
        Self {
            features,
            confidence_decay,
        }
    }

    /// Confidence `steps_ahead` months past the last observed month.
    ///
    /// `base · decay^h`, floored at 0.45. Targets inside the history use `h = 0`.
    pub fn step_confidence(&self, base: f64, steps_ahead: i64) -> f64 {
        let h = i32::try_from(steps_ahead.max(0)).unwrap_or(i32::MAX);
        (base * self.confidence_decay.powi(h)).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
    }

    /// Project every requested month.
    ///
    /// `anchor` is the month with index 0 and `last_index` the index of the
    /// most recent observed month. A projection too large to represent is
    /// reported as zero and flagged `degraded`.
    pub fn project(
        &self,
        coefficients: &ModelCoefficients,
        anchor: NaiveDate,
        last_index: i64,
        base_confidence: f64,
        request: &ForecastRequest,
    ) -> Vec<ForecastPoint> {
        request
            .target_months()
            .iter()
            .map(|&date| {
                let month_index = months_between(anchor, date);
                let features = self.features.build(month_index);
                let confidence = self.step_confidence(base_confidence, month_index - last_index);
                let predicted_revenue = inv_log_revenue(coefficients.predict_log(&features));
                let predicted_orders = request.orders_for(predicted_revenue);

                if !predicted_revenue.is_finite() || !predicted_orders.is_finite() {
                    warn!(
                        target_month = %date,
                        month_index,
                        "projection overflowed; forecasting zero"
                    );
                    return ForecastPoint {
                        date,
                        predicted_revenue: 0.0,
                        predicted_orders: 0.0,
                        confidence,
                        degraded: true,
                    };
                }

                ForecastPoint {
                    date,
                    predicted_revenue,
                    predicted_orders,
                    confidence,
                    degraded: false,
                }
            })
            .collect()
    }
}
