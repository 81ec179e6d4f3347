//! Numerical building blocks of the regression.

pub mod metrics;
pub mod solver;
pub mod weights;

pub use metrics::{
    confidence_from_mape, evaluate_fit, fitted_revenue, mape, weighted_rms, CONFIDENCE_CEILING,
    CONFIDENCE_FLOOR,
};
pub use solver::{fit_weighted, ModelCoefficients, NormalEquations, WeightedObservation, PIVOT_TOLERANCE};
pub use weights::RecencyWeights;
