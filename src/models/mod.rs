//! Forecasting models and the engine that selects between them.

mod traits;

pub mod engine;
pub mod generator;
pub mod regression;
pub mod seasonal_naive;

pub use engine::{ForecastEngine, HistoryState};
pub use generator::ForecastGenerator;
pub use regression::WeightedFourierRegression;
pub use seasonal_naive::SeasonalNaiveFallback;
pub use traits::{BoxedModel, RevenueModel};
