//! Recency weighting of historical observations.

use crate::config::EngineConfig;
use crate::error::{ForecastError, Result};

/// Decay-based observation weights.
///
/// A sample `months_ago` months old gets `max(min_weight, decay^(months_ago / 12))`,
/// so the most recent month weighs exactly 1.0 and older months never fall
/// below the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyWeights {
    decay: f64,
    min_weight: f64,
}

impl RecencyWeights {
    pub fn new(decay: f64, min_weight: f64) -> Result<Self> {
        if !decay.is_finite() || decay <= 0.0 || decay > 1.0 {
            return Err(ForecastError::InvalidConfig(format!(
                "recency decay must be in (0, 1], got {}",
                decay
            )));
        }
        if !min_weight.is_finite() || min_weight <= 0.0 || min_weight > 1.0 {
            return Err(ForecastError::InvalidConfig(format!(
                "min weight must be in (0, 1], got {}",
                min_weight
            )));
        }
        Ok(Self { decay, min_weight })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.recency_decay, config.min_weight)
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Weight of an observation `months_ago` months before the latest one.
    pub fn weight_for_age(&self, months_ago: usize) -> f64 {
        if months_ago == 0 {
            return 1.0;
        }
        self.decay
            .powf(months_ago as f64 / 12.0)
            .max(self.min_weight)
    }

    /// Weight of the sample at zero-based position `i` (oldest first) of `n`.
    pub fn weight(&self, n: usize, i: usize) -> f64 {
        self.weight_for_age(n.saturating_sub(1).saturating_sub(i))
    }

    /// Weights for all `n` positions, oldest first.
    pub fn weights(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.weight(n, i)).collect()
    }
}

impl Default for RecencyWeights {
    fn default() -> Self {
        Self {
            decay: 0.55,
            min_weight: 0.3,
        }
    }
}
