//! Forecast request and result structures.

use crate::core::history::{ensure_first_of_month, shift_months, MonthlyHistory};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Which path produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    WeightedFourierRegression,
    SeasonalNaive,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightedFourierRegression => "weighted-fourier-regression",
            Self::SeasonalNaive => "seasonal-naive",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-sample quality of a regression fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingMetrics {
    /// Mean absolute percentage error over months with positive revenue.
    pub mape: f64,
    /// Weighted RMS of log-domain residuals.
    pub residual_std: f64,
    /// Confidence score in `[0.45, 0.92]`.
    pub confidence: f64,
}

/// A single projected month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_revenue: f64,
    pub predicted_orders: f64,
    pub confidence: f64,
    /// Set when the point could not be derived from history.
    pub degraded: bool,
}

/// The months to project and the order value used to derive order counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    target_months: Vec<NaiveDate>,
    average_order_value: f64,
}

impl ForecastRequest {
    /// Request explicit target months.
    ///
    /// Every target must fall on the first of a month. `average_order_value`
    /// must be finite and non-negative; zero yields zero predicted orders.
    pub fn new(target_months: Vec<NaiveDate>, average_order_value: f64) -> Result<Self> {
        for &date in &target_months {
            ensure_first_of_month(date)?;
        }
        if !average_order_value.is_finite() || average_order_value < 0.0 {
            return Err(ForecastError::InvalidInput(format!(
                "average order value must be finite and non-negative, got {}",
                average_order_value
            )));
        }
        Ok(Self {
            target_months,
            average_order_value,
        })
    }

    /// Request the `horizon` months that follow the last month of `history`.
    pub fn next_months(
        history: &MonthlyHistory,
        horizon: usize,
        average_order_value: f64,
    ) -> Result<Self> {
        let last = history.last().date;
        let steps = i64::try_from(horizon).map_err(|_| {
            ForecastError::InvalidInput(format!("horizon of {} months is out of range", horizon))
        })?;
        let targets = (1..=steps)
            .map(|step| {
                shift_months(last, step).ok_or_else(|| {
                    ForecastError::InvalidInput(format!(
                        "horizon of {} months from {} is out of range",
                        horizon, last
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(targets, average_order_value)
    }

    pub fn target_months(&self) -> &[NaiveDate] {
        &self.target_months
    }

    pub fn average_order_value(&self) -> f64 {
        self.average_order_value
    }

    pub fn horizon(&self) -> usize {
        self.target_months.len()
    }

    /// Orders implied by a revenue figure.
    pub fn orders_for(&self, revenue: f64) -> f64 {
        if self.average_order_value > 0.0 {
            revenue / self.average_order_value
        } else {
            0.0
        }
    }
}

/// Result returned to the analytics layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutput {
    pub model: ModelKind,
    pub degraded: bool,
    /// `None` on the seasonal-naive path.
    pub training_metrics: Option<TrainingMetrics>,
    pub forecast: Vec<ForecastPoint>,
}

impl ForecastOutput {
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    pub fn predicted_revenues(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.predicted_revenue).collect()
    }

    /// Render the output contract as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
