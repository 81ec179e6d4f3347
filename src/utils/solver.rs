//! Weighted ridge least squares on a fixed-size arena.
//!
//! Builds the normal equations `A·x = b` with
//! `A[i][j] = Σ w·f[i]·f[j] + ε·δij` and `b[i] = Σ w·f[i]·y`, then solves them
//! by Gaussian elimination with partial pivoting. The feature dimension is
//! bounded by [`MAX_FEATURES`], so the matrix lives on the stack.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, MAX_FEATURES};
use crate::transform::log_revenue;
use tracing::debug;

/// Pivots smaller than this are treated as singular.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// One month prepared for the regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedObservation {
    pub features: FeatureVector,
    /// `ln(revenue + 1)`.
    pub log_revenue: f64,
    /// Original revenue, kept for percentage errors.
    pub revenue: f64,
    pub weight: f64,
}

impl WeightedObservation {
    pub fn new(features: FeatureVector, revenue: f64, weight: f64) -> Self {
        Self {
            features,
            log_revenue: log_revenue(revenue),
            revenue,
            weight,
        }
    }
}

/// Solution of the regularized normal equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelCoefficients {
    values: [f64; MAX_FEATURES],
    len: usize,
}

impl ModelCoefficients {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn intercept(&self) -> f64 {
        self.values[0]
    }

    /// Coefficient of the linear month-index term.
    pub fn trend(&self) -> f64 {
        self.values[1]
    }

    /// `(sin, cos)` coefficients of harmonic `k` (1-based).
    pub fn harmonic(&self, k: usize) -> Option<(f64, f64)> {
        if k == 0 || 3 + 2 * (k - 1) >= self.len {
            return None;
        }
        let base = 2 + 2 * (k - 1);
        Some((self.values[base], self.values[base + 1]))
    }

    /// Log-domain prediction `Σ coefficient[i]·feature[i]`.
    pub fn predict_log(&self, features: &FeatureVector) -> f64 {
        features.dot(self.as_slice())
    }
}

/// Accumulated normal equations for a fixed feature dimension.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    a: [[f64; MAX_FEATURES]; MAX_FEATURES],
    b: [f64; MAX_FEATURES],
    dim: usize,
    observations: usize,
}

impl NormalEquations {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 || dim > MAX_FEATURES {
            return Err(ForecastError::ModelFit(format!(
                "feature dimension must be in 1..={}, got {}",
                MAX_FEATURES, dim
            )));
        }
        Ok(Self {
            a: [[0.0; MAX_FEATURES]; MAX_FEATURES],
            b: [0.0; MAX_FEATURES],
            dim,
            observations: 0,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Add one observation's weighted outer product.
    pub fn accumulate(&mut self, obs: &WeightedObservation) -> Result<()> {
        let f = obs.features.as_slice();
        if f.len() != self.dim {
            return Err(ForecastError::ModelFit(format!(
                "feature dimension mismatch: expected {}, got {}",
                self.dim,
                f.len()
            )));
        }

        let w = obs.weight;
        for i in 0..self.dim {
            let wfi = w * f[i];
            // Upper triangle only; mirrored before solving.
            for j in i..self.dim {
                self.a[i][j] += wfi * f[j];
            }
            self.b[i] += wfi * obs.log_revenue;
        }
        self.observations += 1;
        Ok(())
    }

    /// Add `epsilon` to every diagonal entry.
    pub fn add_ridge(&mut self, epsilon: f64) {
        for i in 0..self.dim {
            self.a[i][i] += epsilon;
        }
    }

    /// Entry `A[i][j]` of the symmetric normal matrix.
    pub fn matrix_entry(&self, i: usize, j: usize) -> f64 {
        if i <= j {
            self.a[i][j]
        } else {
            self.a[j][i]
        }
    }

    /// Entry `b[i]` of the right-hand side.
    pub fn rhs_entry(&self, i: usize) -> f64 {
        self.b[i]
    }

    /// Solve `A·x = b` by Gaussian elimination with partial pivoting.
    ///
    /// Fails with [`ForecastError::ModelFit`] when the largest remaining pivot
    /// is below [`PIVOT_TOLERANCE`] or the solution is not finite.
    pub fn solve(&self) -> Result<ModelCoefficients> {
        let n = self.dim;
        let mut aug = [[0.0; MAX_FEATURES + 1]; MAX_FEATURES];
        for i in 0..n {
            for j in 0..n {
                aug[i][j] = self.matrix_entry(i, j);
            }
            aug[i][n] = self.b[i];
        }

        // Forward elimination
        for col in 0..n {
            let mut max_row = col;
            let mut max_val = aug[col][col].abs();
            for row in (col + 1)..n {
                if aug[row][col].abs() > max_val {
                    max_val = aug[row][col].abs();
                    max_row = row;
                }
            }

            if !(max_val >= PIVOT_TOLERANCE) {
                return Err(ForecastError::ModelFit(format!(
                    "pivot {:e} in column {} is below tolerance {:e}",
                    max_val, col, PIVOT_TOLERANCE
                )));
            }

            aug.swap(col, max_row);

            for row in (col + 1)..n {
                let factor = aug[row][col] / aug[col][col];
                if factor == 0.0 {
                    continue;
                }
                for j in col..=n {
                    aug[row][j] -= factor * aug[col][j];
                }
            }
        }

        // Back substitution
        let mut values = [0.0; MAX_FEATURES];
        for i in (0..n).rev() {
            let mut sum = aug[i][n];
            for j in (i + 1)..n {
                sum -= aug[i][j] * values[j];
            }
            values[i] = sum / aug[i][i];
        }

        if values[..n].iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "solution contains non-finite coefficients".to_string(),
            ));
        }

        Ok(ModelCoefficients { values, len: n })
    }
}

/// Fit ridge-regularized weighted least squares to the observations.
///
/// Requires at least as many observations as features.
pub fn fit_weighted(observations: &[WeightedObservation], epsilon: f64) -> Result<ModelCoefficients> {
    let dim = match observations.first() {
        Some(obs) => obs.features.len(),
        None => {
            return Err(ForecastError::ModelFit(
                "no observations to fit".to_string(),
            ))
        }
    };

    if observations.len() < dim {
        return Err(ForecastError::ModelFit(format!(
            "need at least {} observations for {} features, got {}",
            dim,
            dim,
            observations.len()
        )));
    }

    let mut system = NormalEquations::new(dim)?;
    for obs in observations {
        system.accumulate(obs)?;
    }
    system.add_ridge(epsilon);

    debug!(
        dimension = dim,
        observations = system.observations(),
        epsilon = epsilon,
        "solving weighted normal equations"
    );

    system.solve()
}
