//! Seasonal-naive fallback.
//!
//! Forecasts each month with the revenue recorded one season earlier. Used when
//! the history is too short to trust the regression, or when the regression
//! could not be fitted.

use crate::config::EngineConfig;
use crate::core::{
    shift_months, ForecastPoint, ForecastRequest, ModelKind, MonthlyHistory,
};
use crate::error::{ForecastError, Result};
use crate::models::RevenueModel;
use chrono::NaiveDate;
use tracing::warn;

/// Seasonal-naive forecaster over calendar months.
///
/// Each forecast equals the revenue of the same month one season earlier.
/// Months without such an observation are forecast as zero and flagged
/// `degraded`.
#[derive(Debug, Clone)]
pub struct SeasonalNaiveFallback {
    season_length: usize,
    confidence: f64,
    history: Option<MonthlyHistory>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
}

impl SeasonalNaiveFallback {
    /// Create a fallback with the given season length and fixed confidence.
    pub fn new(season_length: usize, confidence: f64) -> Self {
        Self {
            season_length,
            confidence,
            history: None,
            fitted: None,
            residuals: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.season_length, config.naive_confidence)
    }

    /// Get the seasonal period in months.
    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Revenue one season before `date`, if recorded.
    fn seasonal_value(&self, history: &MonthlyHistory, date: NaiveDate) -> Option<f64> {
        shift_months(date, -(self.season_length as i64)).and_then(|prev| history.revenue_at(prev))
    }

    /// Forecast directly from a history without storing it.
    pub fn forecast(&self, history: &MonthlyHistory, request: &ForecastRequest) -> Vec<ForecastPoint> {
        request
            .target_months()
            .iter()
            .map(|&date| match self.seasonal_value(history, date) {
                Some(revenue) => ForecastPoint {
                    date,
                    predicted_revenue: revenue,
                    predicted_orders: request.orders_for(revenue),
                    confidence: self.confidence,
                    degraded: false,
                },
                None => {
                    warn!(
                        target_month = %date,
                        season_length = self.season_length,
                        "no observation one season earlier; forecasting zero"
                    );
                    ForecastPoint {
                        date,
                        predicted_revenue: 0.0,
                        predicted_orders: 0.0,
                        confidence: self.confidence,
                        degraded: true,
                    }
                }
            })
            .collect()
    }
}

impl Default for SeasonalNaiveFallback {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl RevenueModel for SeasonalNaiveFallback {
    fn fit(&mut self, history: &MonthlyHistory) -> Result<()> {
        // Fitted values: y_hat[t] = y[t - season], NaN where no such month exists
        let fitted: Vec<f64> = history
            .samples()
            .iter()
            .map(|s| self.seasonal_value(history, s.date).unwrap_or(f64::NAN))
            .collect();

        let residuals = history
            .samples()
            .iter()
            .zip(fitted.iter())
            .map(|(s, f)| s.revenue - f)
            .collect();

        self.history = Some(history.clone());
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);

        Ok(())
    }

    fn predict(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>> {
        match &self.history {
            Some(history) => Ok(self.forecast(history, request)),
            None => Err(ForecastError::FitRequired),
        }
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn kind(&self) -> ModelKind {
        ModelKind::SeasonalNaive
    }
}
