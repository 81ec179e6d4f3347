//! Forecast engine: chooses between the regression and the seasonal-naive path.
//!
//! The choice is made once per request from the history length. A regression
//! that cannot be fitted degrades to the seasonal-naive path instead of
//! failing, so a validated request always yields a forecast.

use crate::config::EngineConfig;
use crate::core::{
    ForecastOutput, ForecastPoint, ForecastRequest, ModelKind, MonthlyHistory, MonthlyRevenue,
    TrainingMetrics,
};
use crate::error::{ForecastError, Result};
use crate::models::{RevenueModel, SeasonalNaiveFallback, WeightedFourierRegression};
use tracing::{debug, warn};

/// Whether a history is long enough for the regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    InsufficientHistory,
    SufficientHistory,
}

impl HistoryState {
    /// Classify `months` distinct months under `config`.
    pub fn evaluate(months: usize, config: &EngineConfig) -> Self {
        if config
            .threshold_rule
            .admits(months, config.min_months_for_regression)
        {
            Self::SufficientHistory
        } else {
            Self::InsufficientHistory
        }
    }
}

/// Stateless forecasting engine.
///
/// # Example
///
/// ```
/// use revenue_forecast::prelude::*;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
/// let history = MonthlyHistory::from_values(start, &[10_000.0; 24]).unwrap();
/// let request = ForecastRequest::next_months(&history, 6, 50.0).unwrap();
///
/// let engine = ForecastEngine::new(EngineConfig::default()).unwrap();
/// let output = engine.forecast(&history, &request);
///
/// assert_eq!(output.model, ModelKind::WeightedFourierRegression);
/// assert!(!output.degraded);
/// assert_eq!(output.horizon(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: EngineConfig,
    regression: WeightedFourierRegression,
    fallback: SeasonalNaiveFallback,
}

impl ForecastEngine {
    /// Validate the configuration and build the engine.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let regression = WeightedFourierRegression::new(&config)?;
        let fallback = SeasonalNaiveFallback::from_config(&config);
        Ok(Self {
            config,
            regression,
            fallback,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history_state(&self, history: &MonthlyHistory) -> HistoryState {
        HistoryState::evaluate(history.len(), &self.config)
    }

    /// Forecast the requested months from a validated history.
    pub fn forecast(&self, history: &MonthlyHistory, request: &ForecastRequest) -> ForecastOutput {
        let state = self.history_state(history);
        debug!(
            months = history.len(),
            threshold = self.config.min_months_for_regression,
            rule = ?self.config.threshold_rule,
            state = ?state,
            "selected forecasting path"
        );

        match state {
            HistoryState::InsufficientHistory => self.seasonal_naive(history, request, false),
            HistoryState::SufficientHistory => match self.regression(history, request) {
                Ok((metrics, forecast)) => ForecastOutput {
                    model: ModelKind::WeightedFourierRegression,
                    degraded: forecast.iter().any(|p| p.degraded),
                    training_metrics: Some(metrics),
                    forecast,
                },
                Err(err) => {
                    warn!(error = %err, "regression failed; falling back to seasonal naive");
                    self.seasonal_naive(history, request, true)
                }
            },
        }
    }

    /// Validate raw records and forecast the `horizon` months after them.
    ///
    /// Input errors are returned; fit failures are not.
    pub fn forecast_records(
        &self,
        records: Vec<MonthlyRevenue>,
        horizon: usize,
        average_order_value: f64,
    ) -> Result<ForecastOutput> {
        let history = MonthlyHistory::new(records)?;
        let request = ForecastRequest::next_months(&history, horizon, average_order_value)?;
        Ok(self.forecast(&history, &request))
    }

    fn regression(
        &self,
        history: &MonthlyHistory,
        request: &ForecastRequest,
    ) -> Result<(TrainingMetrics, Vec<ForecastPoint>)> {
        let mut model = self.regression.clone();
        model.fit(history)?;
        let forecast = model.predict(request)?;
        let metrics = model
            .training_metrics()
            .ok_or_else(|| ForecastError::ModelFit("fit produced no metrics".into()))?;
        Ok((metrics, forecast))
    }

    fn seasonal_naive(
        &self,
        history: &MonthlyHistory,
        request: &ForecastRequest,
        fit_failed: bool,
    ) -> ForecastOutput {
        let forecast = self.fallback.forecast(history, request);
        let degraded = fit_failed || forecast.iter().any(|p| p.degraded);
        ForecastOutput {
            model: ModelKind::SeasonalNaive,
            degraded,
            training_metrics: None,
            forecast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdRule;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    fn history(n: usize) -> MonthlyHistory {
        let values: Vec<f64> = (0..n).map(|i| 4_000.0 + 25.0 * i as f64).collect();
        MonthlyHistory::from_values(start(), &values).unwrap()
    }

    #[test]
    fn history_state_follows_threshold_rule() {
        let inclusive = EngineConfig::default();
        assert_eq!(
            HistoryState::evaluate(18, &inclusive),
            HistoryState::SufficientHistory
        );
        assert_eq!(
            HistoryState::evaluate(17, &inclusive),
            HistoryState::InsufficientHistory
        );

        let exclusive = EngineConfig::default().with_threshold_rule(ThresholdRule::Exclusive);
        assert_eq!(
            HistoryState::evaluate(18, &exclusive),
            HistoryState::InsufficientHistory
        );
        assert_eq!(
            HistoryState::evaluate(19, &exclusive),
            HistoryState::SufficientHistory
        );
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = ForecastEngine::new(EngineConfig::default().with_harmonics(0)).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig(_)));
    }

    #[test]
    fn regression_output_carries_metrics() {
        let engine = ForecastEngine::new(EngineConfig::default()).unwrap();
        let history = history(30);
        let request = ForecastRequest::next_months(&history, 4, 20.0).unwrap();

        let output = engine.forecast(&history, &request);
        assert_eq!(output.model, ModelKind::WeightedFourierRegression);
        assert!(!output.degraded);
        let metrics = output.training_metrics.unwrap();
        assert!((0.45..=0.92).contains(&metrics.confidence));
        assert!(output.forecast.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn short_history_uses_seasonal_naive() {
        let engine = ForecastEngine::new(EngineConfig::default()).unwrap();
        let history = history(13);
        let request = ForecastRequest::next_months(&history, 2, 20.0).unwrap();

        let output = engine.forecast(&history, &request);
        assert_eq!(output.model, ModelKind::SeasonalNaive);
        assert!(output.training_metrics.is_none());
        assert!(!output.degraded);
        // 2023-02 <- 2022-02, 2023-03 <- 2022-03
        assert_eq!(output.predicted_revenues(), vec![4_025.0, 4_050.0]);
    }

    #[test]
    fn fit_failure_degrades_to_seasonal_naive() {
        // Period 2 makes the sine column vanish; without ridge the system is singular.
        let config = EngineConfig::default()
            .with_harmonics(1)
            .with_season_length(2)
            .with_epsilon(0.0)
            .with_min_months_for_regression(4);
        let engine = ForecastEngine::new(config).unwrap();
        let history = history(4);
        let request = ForecastRequest::next_months(&history, 2, 20.0).unwrap();

        let output = engine.forecast(&history, &request);
        assert_eq!(output.model, ModelKind::SeasonalNaive);
        assert!(output.degraded);
        assert!(output.training_metrics.is_none());
        assert_eq!(output.horizon(), 2);
    }

    #[test]
    fn forecast_records_surfaces_input_errors() {
        let engine = ForecastEngine::new(EngineConfig::default()).unwrap();
        let records = vec![
            MonthlyRevenue::new(start(), 10.0),
            MonthlyRevenue::new(start(), 12.0),
        ];
        assert!(matches!(
            engine.forecast_records(records, 3, 10.0),
            Err(ForecastError::InvalidInput(_))
        ));
    }
}
