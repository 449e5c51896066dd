//! Discretized MDP state and the observation handed to the agent.

/// Dense 3-D tensor `(rows, depth, channels)` in row-major order.
///
/// Produced by the order-book source as the engineered bid/ask feature.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct FeatureTensor {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl FeatureTensor {
    /// Creates a zero-filled tensor.
    #[must_use]
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Tensor shape `(rows, depth, channels)`.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Flat row-major view.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn offset(&self, row: usize, depth: usize, channel: usize) -> Option<usize> {
        let [r, d, c] = self.shape;
        (row < r && depth < d && channel < c).then(|| (row * d + depth) * c + channel)
    }

    /// Value at `(row, depth, channel)`.
    #[must_use]
    pub fn get(&self, row: usize, depth: usize, channel: usize) -> Option<f64> {
        self.offset(row, depth, channel).map(|o| self.data[o])
    }

    /// Writes a value, ignoring out-of-range coordinates.
    pub fn set(&mut self, row: usize, depth: usize, channel: usize, value: f64) {
        if let Some(o) = self.offset(row, depth, channel) {
            self.data[o] = value;
        }
    }
}

/// Discretized `(t, i)` state plus the market feature.
///
/// A fresh instance is created on every reset and step; nothing mutates a
/// state after construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiscretizedState {
    t: f64,
    i: f64,
    features: FeatureTensor,
}

impl DiscretizedState {
    /// Creates a new state.
    #[must_use]
    pub fn new(t: f64, i: f64, features: FeatureTensor) -> Self {
        Self { t, i, features }
    }

    /// Remaining time bucket
    #[must_use]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Remaining inventory bucket
    #[must_use]
    pub fn i(&self) -> f64 {
        self.i
    }

    /// Bid/ask feature tensor
    #[must_use]
    pub fn features(&self) -> &FeatureTensor {
        &self.features
    }

    /// Observation encoding for the agent.
    #[must_use]
    pub fn to_observation(&self) -> Observation {
        Observation {
            t: self.t,
            i: self.i,
            features: self.features.clone(),
        }
    }
}

/// Observation returned by `reset` and `step`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Observation {
    /// Remaining time bucket
    pub t: f64,
    /// Remaining inventory bucket
    pub i: f64,
    /// Bid/ask feature tensor of shape `(2*lookback, depth, 2)`
    pub features: FeatureTensor,
}

impl Observation {
    /// Shape of the feature part.
    #[must_use]
    pub fn features_shape(&self) -> [usize; 3] {
        self.features.shape()
    }

    /// Flattened `[t, i, features...]`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(2 + self.features.as_slice().len());
        out.push(self.t);
        out.push(self.i);
        out.extend_from_slice(self.features.as_slice());
        out
    }
}
