//! Discretized value grids built from `(min, max, step)`.

use tranche_types::GridSpec;

use crate::error::EnvError;

/// Relative float tolerance (in units of `step`) for grid construction and
/// lookups.
pub const GRID_TOLERANCE: f64 = 1e-9;

/// Upper bound on the number of grid values.
pub const MAX_GRID_LEN: usize = 1_000_000;

/// Strictly increasing, finite, non-empty sequence `min, min + step, …`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
    step: f64,
}

impl Grid {
    /// Builds the grid for `spec`.
    ///
    /// Values are `min + k * step`. A value overshooting `max` by at most
    /// `step * GRID_TOLERANCE` is clamped to `max`, so `(0, 0.3, 0.1)` ends
    /// at exactly `0.3`.
    ///
    /// # Errors
    /// Returns [`EnvError::ConfigValidation`] for non-finite bounds, a
    /// non-positive step, `min > max`, or more than [`MAX_GRID_LEN`] values.
    pub fn build(spec: GridSpec) -> Result<Self, EnvError> {
        let GridSpec { min, max, step } = spec;
        if !min.is_finite() || !max.is_finite() || !step.is_finite() {
            return Err(EnvError::ConfigValidation(format!(
                "grid bounds must be finite: ({min}, {max}, {step})"
            )));
        }
        if step <= 0.0 {
            return Err(EnvError::ConfigValidation(format!(
                "grid step must be > 0, got {step}"
            )));
        }
        if min > max {
            return Err(EnvError::ConfigValidation(format!(
                "grid min {min} exceeds max {max}"
            )));
        }

        let slack = step * GRID_TOLERANCE;
        let mut values = Vec::new();
        for k in 0..=MAX_GRID_LEN {
            #[allow(clippy::cast_precision_loss)]
            let value = min + k as f64 * step;
            if value <= max {
                values.push(value);
            } else {
                if value - max <= slack {
                    values.push(max);
                }
                return Ok(Self { values, step });
            }
        }

        Err(EnvError::ConfigValidation(format!(
            "grid ({min}, {max}, {step}) has more than {MAX_GRID_LEN} values"
        )))
    }

    /// Grid values in increasing order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Step the grid was built with.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a built grid holds at least `min`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Smallest value.
    #[must_use]
    pub fn first(&self) -> f64 {
        self.values[0]
    }

    /// Largest value.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Index of `value`, compared with `step * GRID_TOLERANCE`.
    #[must_use]
    pub fn position(&self, value: f64) -> Option<usize> {
        let slack = self.step * GRID_TOLERANCE;
        self.values.iter().position(|v| (v - value).abs() <= slack)
    }

    /// Element of `{0.0} ∪ grid` closest to `q`; ties go to the smaller
    /// candidate.
    #[must_use]
    pub fn nearest_with_zero(&self, q: f64) -> f64 {
        let mut best = 0.0;
        let mut best_dist = q.abs();
        for &candidate in &self.values {
            let dist = (candidate - q).abs();
            if dist < best_dist || (dist == best_dist && candidate < best) {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }
}
