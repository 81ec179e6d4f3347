//! Core data structures for monthly revenue forecasting.

mod forecast;
mod history;

pub use forecast::{ForecastOutput, ForecastPoint, ForecastRequest, ModelKind, TrainingMetrics};
pub use history::{months_between, shift_months, HistoricalSample, MonthlyHistory, MonthlyRevenue};
