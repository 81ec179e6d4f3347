//! Error types for the revenue-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Historical input or request violates the input contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value outside its documented range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Prediction requested from a model that has not been fitted.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// The regularized normal equations could not be solved.
    ///
    /// Never surfaced by [`ForecastEngine::forecast`](crate::models::ForecastEngine::forecast),
    /// which degrades to the seasonal-naive path instead.
    #[error("model fit failed: {0}")]
    ModelFit(String),
}

impl ForecastError {
    /// Returns true for errors caused by the caller (bad input, bad config, or
    /// predicting before fitting).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidConfig(_) | Self::FitRequired
        )
    }
}
