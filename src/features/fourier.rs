//! Fourier design features for monthly revenue.
//!
//! A month index `t` maps to
//! `[1, t, sin(2π·1·t/m), cos(2π·1·t/m), …, sin(2π·K·t/m), cos(2π·K·t/m)]`
//! where `K` is the number of harmonics and `m` the season length.

use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};
use std::f64::consts::PI;

/// Upper bound on configurable harmonics.
pub const MAX_HARMONICS: usize = 12;

/// Capacity of a [`FeatureVector`]: intercept, trend and `MAX_HARMONICS` pairs.
pub const MAX_FEATURES: usize = 2 + 2 * MAX_HARMONICS;

/// Feature dimension for a given number of harmonics.
pub const fn feature_dimension(harmonics: usize) -> usize {
    2 + 2 * harmonics
}

/// Fixed-capacity feature vector; only the first `len` entries are active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; MAX_FEATURES],
    len: usize,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Dot product with a coefficient slice of the same dimension.
    pub fn dot(&self, coefficients: &[f64]) -> f64 {
        self.as_slice()
            .iter()
            .zip(coefficients)
            .map(|(f, c)| f * c)
            .sum()
    }

    /// `(sin, cos)` of harmonic `k` (1-based).
    pub fn harmonic(&self, k: usize) -> Option<(f64, f64)> {
        if k == 0 || 3 + 2 * (k - 1) >= self.len {
            return None;
        }
        let base = 2 + 2 * (k - 1);
        Some((self.values[base], self.values[base + 1]))
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.as_slice()[index]
    }
}

/// Builds Fourier feature vectors from month indices.
///
/// # Example
///
/// ```
/// use revenue_forecast::features::FourierFeatures;
///
/// let builder = FourierFeatures::new(6, 12).unwrap();
/// let features = builder.build(3);
/// assert_eq!(features.len(), 14);
/// assert_eq!(features[0], 1.0);
/// assert_eq!(features[1], 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierFeatures {
    harmonics: usize,
    season_length: usize,
}

impl FourierFeatures {
    pub fn new(harmonics: usize, season_length: usize) -> Result<Self> {
        if harmonics < 1 || harmonics > MAX_HARMONICS {
            return Err(ForecastError::InvalidConfig(format!(
                "harmonics must be in 1..={}, got {}",
                MAX_HARMONICS, harmonics
            )));
        }
        if season_length < 1 {
            return Err(ForecastError::InvalidConfig(
                "season length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            harmonics,
            season_length,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.harmonics, config.season_length)
    }

    pub fn harmonics(&self) -> usize {
        self.harmonics
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }

    pub fn dimension(&self) -> usize {
        feature_dimension(self.harmonics)
    }

    /// Feature vector for `month_index`; negative indices lie before the anchor.
    pub fn build(&self, month_index: i64) -> FeatureVector {
        let mut values = [0.0; MAX_FEATURES];
        let t = month_index as f64;
        values[0] = 1.0;
        values[1] = t;

        let base_freq = 2.0 * PI / self.season_length as f64;
        for k in 1..=self.harmonics {
            let angle = base_freq * k as f64 * t;
            let (sin, cos) = angle.sin_cos();
            values[2 + 2 * (k - 1)] = sin;
            values[3 + 2 * (k - 1)] = cos;
        }

        FeatureVector {
            values,
            len: self.dimension(),
        }
    }
}
