//! Weighted Fourier regression on log revenue.
//!
//! Each month becomes a Fourier feature vector weighted by recency; the
//! regularized weighted least-squares solution is evaluated in-sample and then
//! projected onto the requested months.

use crate::config::EngineConfig;
use crate::core::{
    ForecastPoint, ForecastRequest, ModelKind, MonthlyHistory, TrainingMetrics,
};
use crate::error::{ForecastError, Result};
use crate::features::FourierFeatures;
use crate::models::generator::ForecastGenerator;
use crate::models::RevenueModel;
use crate::utils::metrics::{evaluate_fit, fitted_revenue};
use crate::utils::solver::{fit_weighted, ModelCoefficients, WeightedObservation};
use crate::utils::weights::RecencyWeights;
use chrono::NaiveDate;
use tracing::debug;

/// Weighted Fourier regression with ridge regularization.
///
/// # Example
/// ```
/// use revenue_forecast::config::EngineConfig;
/// use revenue_forecast::core::{ForecastRequest, MonthlyHistory};
/// use revenue_forecast::models::{RevenueModel, WeightedFourierRegression};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
/// let revenue: Vec<f64> = (0..24).map(|i| 8_000.0 + 50.0 * i as f64).collect();
/// let history = MonthlyHistory::from_values(start, &revenue).unwrap();
///
/// let mut model = WeightedFourierRegression::new(&EngineConfig::default()).unwrap();
/// model.fit(&history).unwrap();
///
/// let request = ForecastRequest::next_months(&history, 3, 80.0).unwrap();
/// let points = model.predict(&request).unwrap();
/// assert_eq!(points.len(), 3);
/// assert!(points[0].predicted_revenue > 9_000.0);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedFourierRegression {
    features: FourierFeatures,
    weights: RecencyWeights,
    epsilon: f64,
    generator: ForecastGenerator,
    anchor: Option<NaiveDate>,
    last_index: i64,
    coefficients: Option<ModelCoefficients>,
    metrics: Option<TrainingMetrics>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl WeightedFourierRegression {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let features = FourierFeatures::from_config(config)?;
        let weights = RecencyWeights::from_config(config)?;
        if !config.epsilon.is_finite() || config.epsilon < 0.0 {
            return Err(ForecastError::InvalidConfig(format!(
                "epsilon must be finite and non-negative, got {}",
                config.epsilon
            )));
        }

        Ok(Self {
            features,
            weights,
            epsilon: config.epsilon,
            generator: ForecastGenerator::new(features, config.confidence_decay),
            anchor: None,
            last_index: 0,
            coefficients: None,
            metrics: None,
            fitted: None,
            residuals: None,
        })
    }

    /// Recency-weighted observations for every historical month.
    pub fn observations(&self, history: &MonthlyHistory) -> Vec<WeightedObservation> {
        let n = history.len();
        history
            .samples()
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                WeightedObservation::new(
                    self.features.build(sample.month_index),
                    sample.revenue,
                    self.weights.weight(n, i),
                )
            })
            .collect()
    }

    /// Fitted coefficients, once fitted.
    pub fn coefficients(&self) -> Option<&ModelCoefficients> {
        self.coefficients.as_ref()
    }
}

impl RevenueModel for WeightedFourierRegression {
    fn fit(&mut self, history: &MonthlyHistory) -> Result<()> {
        let observations = self.observations(history);
        let coefficients = fit_weighted(&observations, self.epsilon)?;
        let metrics = evaluate_fit(&coefficients, &observations);

        debug!(
            months = history.len(),
            mape = metrics.mape,
            residual_std = metrics.residual_std,
            confidence = metrics.confidence,
            trend = coefficients.trend(),
            "fitted weighted Fourier regression"
        );

        let fitted = fitted_revenue(&coefficients, &observations);
        let residuals = observations
            .iter()
            .zip(fitted.iter())
            .map(|(o, f)| o.revenue - f)
            .collect();

        self.anchor = Some(history.anchor());
        self.last_index = history.last().month_index;
        self.coefficients = Some(coefficients);
        self.metrics = Some(metrics);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>> {
        let (coefficients, metrics, anchor) = match (&self.coefficients, &self.metrics, self.anchor)
        {
            (Some(c), Some(m), Some(a)) => (c, m, a),
            _ => return Err(ForecastError::FitRequired),
        };

        Ok(self.generator.project(
            coefficients,
            anchor,
            self.last_index,
            metrics.confidence,
            request,
        ))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn training_metrics(&self) -> Option<TrainingMetrics> {
        self.metrics
    }

    fn kind(&self) -> ModelKind {
        ModelKind::WeightedFourierRegression
    }
}
