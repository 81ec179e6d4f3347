//! # revenue-forecast
//!
//! Monthly revenue forecasting for multi-branch retail.
//!
//! Fits a recency-weighted Fourier regression with ridge regularization to
//! log revenue, reports in-sample quality, and projects future months. Short
//! histories, or fits that cannot be solved, use a seasonal-naive forecast
//! instead.

// Index loops mirror the matrix notation of the solver
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::{EngineConfig, ThresholdRule};
    pub use crate::core::{
        ForecastOutput, ForecastPoint, ForecastRequest, ModelKind, MonthlyHistory, MonthlyRevenue,
        TrainingMetrics,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{ForecastEngine, RevenueModel};
}
