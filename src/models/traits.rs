//! RevenueModel trait defining the common interface of both forecasting paths.

use crate::core::{ForecastPoint, ForecastRequest, ModelKind, MonthlyHistory, TrainingMetrics};
use crate::error::Result;

/// Common interface for the regression and the seasonal-naive fallback.
///
/// This trait is object-safe and can be used with `Box<dyn RevenueModel>`.
pub trait RevenueModel {
    /// Fit the model to a validated history.
    fn fit(&mut self, history: &MonthlyHistory) -> Result<()>;

    /// Project the requested months.
    fn predict(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>>;

    /// In-sample fitted revenue, one entry per historical month.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Quality of the fit, when the model performs one.
    fn training_metrics(&self) -> Option<TrainingMetrics> {
        None
    }

    /// Which forecasting path this model implements.
    fn kind(&self) -> ModelKind;

    /// Name reported in the output contract.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed model trait objects.
///
/// # Example
///
/// ```
/// use revenue_forecast::models::{BoxedModel, SeasonalNaiveFallback};
///
/// let model: BoxedModel = Box::new(SeasonalNaiveFallback::default());
/// assert_eq!(model.name(), "seasonal-naive");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedModel = Box<dyn RevenueModel>;
