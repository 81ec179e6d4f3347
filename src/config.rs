//! Engine configuration.
//!
//! Every constant that shapes the model is an explicit option here, so tests and
//! callers can vary them. Keys deserialize from camelCase JSON and missing keys
//! fall back to the documented defaults.
//!
//! # Example
//!
//! ```
//! use revenue_forecast::config::{EngineConfig, ThresholdRule};
//!
//! let config = EngineConfig::default()
//!     .with_harmonics(4)
//!     .with_min_months_for_regression(24)
//!     .with_threshold_rule(ThresholdRule::Exclusive);
//! assert!(config.validate().is_ok());
//!
//! let parsed: EngineConfig = serde_json::from_str(r#"{"recencyDecay": 0.7}"#).unwrap();
//! assert_eq!(parsed.recency_decay, 0.7);
//! assert_eq!(parsed.harmonics, 6);
//! ```

use crate::error::{ForecastError, Result};
use crate::features::{feature_dimension, MAX_HARMONICS};
use crate::utils::metrics::{CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
use serde::{Deserialize, Serialize};

/// How the history length is compared against `min_months_for_regression`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdRule {
    /// `months >= threshold` selects the regression.
    #[default]
    Inclusive,
    /// `months > threshold` selects the regression.
    Exclusive,
}

impl ThresholdRule {
    /// Whether `months` distinct months are enough to run the regression.
    pub fn admits(self, months: usize, threshold: usize) -> bool {
        match self {
            Self::Inclusive => months >= threshold,
            Self::Exclusive => months > threshold,
        }
    }
}

/// Configuration for the forecasting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Number of Fourier harmonic pairs (default 6).
    pub harmonics: usize,
    /// Months per seasonal cycle (default 12).
    pub season_length: usize,
    /// Weight decay per 12 months of age (default 0.55).
    pub recency_decay: f64,
    /// Floor on observation weights (default 0.3).
    pub min_weight: f64,
    /// Ridge term added to the normal-matrix diagonal (default 1e-6).
    pub epsilon: f64,
    /// History length below which the seasonal-naive path is used (default 18).
    pub min_months_for_regression: usize,
    /// Boundary rule for `min_months_for_regression` (default inclusive).
    pub threshold_rule: ThresholdRule,
    /// Per-step multiplier applied to forecast confidence (default 0.98).
    pub confidence_decay: f64,
    /// Fixed confidence of seasonal-naive points (default 0.5).
    pub naive_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            harmonics: 6,
            season_length: 12,
            recency_decay: 0.55,
            min_weight: 0.3,
            epsilon: 1e-6,
            min_months_for_regression: 18,
            threshold_rule: ThresholdRule::Inclusive,
            confidence_decay: 0.98,
            naive_confidence: 0.5,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of Fourier harmonic pairs.
    pub fn with_harmonics(mut self, harmonics: usize) -> Self {
        self.harmonics = harmonics;
        self
    }

    /// Set the seasonal period in months.
    pub fn with_season_length(mut self, season_length: usize) -> Self {
        self.season_length = season_length;
        self
    }

    /// Set the weight decay per 12 months of age.
    pub fn with_recency_decay(mut self, recency_decay: f64) -> Self {
        self.recency_decay = recency_decay;
        self
    }

    /// Set the observation weight floor.
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Set the ridge regularization term.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the history length required for the regression.
    pub fn with_min_months_for_regression(mut self, months: usize) -> Self {
        self.min_months_for_regression = months;
        self
    }

    /// Set how the history length is compared to the threshold.
    pub fn with_threshold_rule(mut self, rule: ThresholdRule) -> Self {
        self.threshold_rule = rule;
        self
    }

    /// Set the per-step confidence multiplier.
    pub fn with_confidence_decay(mut self, decay: f64) -> Self {
        self.confidence_decay = decay;
        self
    }

    /// Set the fixed confidence of seasonal-naive points.
    pub fn with_naive_confidence(mut self, confidence: f64) -> Self {
        self.naive_confidence = confidence;
        self
    }

    /// Length of the feature vector implied by `harmonics`.
    pub fn feature_dimension(&self) -> usize {
        feature_dimension(self.harmonics)
    }

    /// Check every option against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.harmonics < 1 || self.harmonics > MAX_HARMONICS {
            return Err(ForecastError::InvalidConfig(format!(
                "harmonics must be in 1..={}, got {}",
                MAX_HARMONICS, self.harmonics
            )));
        }
        if self.season_length < 1 {
            return Err(ForecastError::InvalidConfig(
                "season length must be at least 1".to_string(),
            ));
        }
        if !unit_interval(self.recency_decay) {
            return Err(ForecastError::InvalidConfig(format!(
                "recency decay must be in (0, 1], got {}",
                self.recency_decay
            )));
        }
        if !unit_interval(self.min_weight) {
            return Err(ForecastError::InvalidConfig(format!(
                "min weight must be in (0, 1], got {}",
                self.min_weight
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ForecastError::InvalidConfig(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        let dim = self.feature_dimension();
        if self.min_months_for_regression < dim {
            return Err(ForecastError::InvalidConfig(format!(
                "min months for regression ({}) must be at least the feature dimension ({})",
                self.min_months_for_regression, dim
            )));
        }
        if !unit_interval(self.confidence_decay) {
            return Err(ForecastError::InvalidConfig(format!(
                "confidence decay must be in (0, 1], got {}",
                self.confidence_decay
            )));
        }
        if !(CONFIDENCE_FLOOR..=CONFIDENCE_CEILING).contains(&self.naive_confidence) {
            return Err(ForecastError::InvalidConfig(format!(
                "naive confidence must be in [{}, {}], got {}",
                CONFIDENCE_FLOOR, CONFIDENCE_CEILING, self.naive_confidence
            )));
        }
        Ok(())
    }
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let config = EngineConfig::default();
        assert_eq!(config.harmonics, 6);
        assert_eq!(config.season_length, 12);
        assert_eq!(config.recency_decay, 0.55);
        assert_eq!(config.min_weight, 0.3);
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.min_months_for_regression, 18);
        assert_eq!(config.threshold_rule, ThresholdRule::Inclusive);
        assert_eq!(config.feature_dimension(), 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_options() {
        let bad = [
            EngineConfig::default().with_harmonics(0),
            EngineConfig::default().with_harmonics(MAX_HARMONICS + 1),
            EngineConfig::default().with_season_length(0),
            EngineConfig::default().with_recency_decay(0.0),
            EngineConfig::default().with_recency_decay(1.5),
            EngineConfig::default().with_min_weight(-0.1),
            EngineConfig::default().with_epsilon(-1e-6),
            EngineConfig::default().with_epsilon(f64::NAN),
            EngineConfig::default().with_min_months_for_regression(13),
            EngineConfig::default().with_confidence_decay(0.0),
            EngineConfig::default().with_naive_confidence(0.95),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ForecastError::InvalidConfig(_))),
                "expected rejection of {:?}",
                config
            );
        }
    }

    #[test]
    fn zero_epsilon_is_allowed() {
        assert!(EngineConfig::default().with_epsilon(0.0).validate().is_ok());
    }

    #[test]
    fn fewer_harmonics_lower_the_minimum_history() {
        let config = EngineConfig::default()
            .with_harmonics(2)
            .with_min_months_for_regression(6);
        assert_eq!(config.feature_dimension(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_rule_boundary() {
        assert!(ThresholdRule::Inclusive.admits(18, 18));
        assert!(!ThresholdRule::Inclusive.admits(17, 18));
        assert!(!ThresholdRule::Exclusive.admits(18, 18));
        assert!(ThresholdRule::Exclusive.admits(19, 18));
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"harmonics": 3, "thresholdRule": "exclusive"}"#).unwrap();
        assert_eq!(config.harmonics, 3);
        assert_eq!(config.threshold_rule, ThresholdRule::Exclusive);
        assert_eq!(config.season_length, 12);
        assert_eq!(config.min_months_for_regression, 18);
    }
}
