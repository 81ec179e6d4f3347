//! Regression features derived from the calendar position of a month.

pub mod fourier;

pub use fourier::{feature_dimension, FeatureVector, FourierFeatures, MAX_FEATURES, MAX_HARMONICS};
