//! Order-book source abstraction consumed by the environment.

use std::ops::Range;

use rand::Rng;
use tranche_types::{BookSnapshot, FeatureTensor};

use crate::error::DataError;
use crate::features::{FeatureOptions, build_features};

const NANOS_PER_SECOND: f64 = 1e9;

/// Converts a duration in seconds to nanoseconds, saturating at the `i64` range.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn seconds_to_ns(seconds: f64) -> i64 {
    (seconds * NANOS_PER_SECOND) as i64
}

/// Sequence of order-book snapshots addressed by index.
///
/// `Clone` is required: the matching engine works on a disposable copy of
/// the source and may consume liquidity in it.
pub trait OrderbookSource: Clone {
    /// Number of snapshots.
    fn len(&self) -> usize;

    /// Snapshot at `index`.
    ///
    /// # Errors
    /// Returns [`DataError::IndexOutOfRange`] for an invalid index.
    fn state(&self, index: usize) -> Result<&BookSnapshot, DataError>;

    /// Mutable snapshot at `index`.
    ///
    /// # Errors
    /// Returns [`DataError::IndexOutOfRange`] for an invalid index.
    fn state_mut(&mut self, index: usize) -> Result<&mut BookSnapshot, DataError>;

    /// Returns `true` if the source holds no snapshots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples a starting snapshot uniformly among the indices `i >= min_head`
    /// that leave at least `runtime_secs` of data after them.
    ///
    /// # Errors
    /// Returns [`DataError::InsufficientData`] when no index qualifies.
    fn random_state<R: Rng + ?Sized>(
        &self,
        runtime_secs: f64,
        min_head: usize,
        rng: &mut R,
    ) -> Result<(BookSnapshot, usize), DataError> {
        let len = self.len();
        let insufficient = DataError::InsufficientData {
            required: min_head + 1,
            available: len,
        };
        if len <= min_head {
            return Err(insufficient);
        }

        let last_ts = self.state(len - 1)?.timestamp_ns;
        let horizon_ns = seconds_to_ns(runtime_secs);
        // Timestamps are non-decreasing, so qualifying indices are contiguous.
        let mut upper = min_head;
        while upper < len && last_ts.saturating_sub(self.state(upper)?.timestamp_ns) >= horizon_ns
        {
            upper += 1;
        }
        if upper == min_head {
            return Err(insufficient);
        }

        let index = rng.gen_range(min_head..upper);
        Ok((self.state(index)?.clone(), index))
    }

    /// Indices from `index` whose timestamps lie within `seconds` of the
    /// snapshot at `index`. Always contains `index` itself.
    ///
    /// # Errors
    /// Returns [`DataError::IndexOutOfRange`] for an invalid index.
    fn index_window(&self, index: usize, seconds: f64) -> Result<Range<usize>, DataError> {
        let start_ts = self.state(index)?.timestamp_ns;
        let horizon_ns = seconds_to_ns(seconds.max(0.0));
        let mut end = index + 1;
        while end < self.len() && self.state(end)?.timestamp_ns.saturating_sub(start_ts) <= horizon_ns
        {
            end += 1;
        }
        Ok(index..end)
    }

    /// Bid/ask feature tensor of shape `(2 * lookback, depth, 2)` over the
    /// `lookback` snapshots ending at `index`.
    ///
    /// # Errors
    /// - [`DataError::IndexOutOfRange`] for an invalid index.
    /// - [`DataError::InsufficientData`] when fewer than `lookback` snapshots
    ///   end at `index`.
    /// - [`DataError::EmptySide`] when normalizing against an empty snapshot.
    fn bid_ask_features(
        &self,
        index: usize,
        lookback: usize,
        qty: f64,
        options: FeatureOptions,
        depth: usize,
    ) -> Result<FeatureTensor, DataError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        if index + 1 < lookback {
            return Err(DataError::InsufficientData {
                required: lookback,
                available: index + 1,
            });
        }

        let window = (index + 1 - lookback..=index)
            .map(|i| self.state(i))
            .collect::<Result<Vec<_>, _>>()?;
        build_features(&window, index, qty, options, depth)
    }
}
