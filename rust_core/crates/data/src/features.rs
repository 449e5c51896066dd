//! Bid/ask feature tensor.
//!
//! The tensor has shape `(2 * lookback, depth, 2)`. Rows `0..lookback` hold
//! the bid sides of the window (oldest snapshot first), rows
//! `lookback..2 * lookback` the ask sides. Channel 0 is price, channel 1 is
//! size. Missing levels and disabled channels stay `0.0`.

use tranche_types::{BookLevel, BookSnapshot, FeatureTensor, OrderSide};

use crate::error::DataError;

/// Channel index of the price feature.
pub const PRICE_CHANNEL: usize = 0;
/// Channel index of the size feature.
pub const SIZE_CHANNEL: usize = 1;

/// Switches for the bid/ask feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeatureOptions {
    /// Divide prices by the anchor price and sizes by the quantity hint
    pub normalize: bool,
    /// Fill the price channel
    pub price: bool,
    /// Fill the size channel
    pub size: bool,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            price: true,
            size: true,
        }
    }
}

/// Builds the feature tensor for `window`, whose last element is the anchor
/// snapshot at `anchor_index`.
///
/// With normalization, prices are divided by the anchor's best ask (best bid
/// if the ask side is empty) and sizes by `qty`. A non-positive `qty` leaves
/// sizes unscaled.
///
/// # Errors
/// - [`DataError::EmptyData`] when `window` is empty.
/// - [`DataError::EmptySide`] when normalizing against an anchor with no levels.
pub fn build_features(
    window: &[&BookSnapshot],
    anchor_index: usize,
    qty: f64,
    options: FeatureOptions,
    depth: usize,
) -> Result<FeatureTensor, DataError> {
    let anchor = window.last().ok_or(DataError::EmptyData)?;
    let lookback = window.len();

    let (price_scale, size_scale) = if options.normalize {
        let reference = anchor
            .best_ask()
            .or_else(|| anchor.best_bid())
            .ok_or(DataError::EmptySide {
                index: anchor_index,
                side: OrderSide::Sell,
            })?;
        (reference, if qty > 0.0 { qty } else { 1.0 })
    } else {
        (1.0, 1.0)
    };

    let mut tensor = FeatureTensor::zeros([2 * lookback, depth, 2]);
    for (row, snapshot) in window.iter().enumerate() {
        let mut write = |row: usize, levels: &[BookLevel]| {
            for (d, level) in levels.iter().take(depth).enumerate() {
                if options.price {
                    tensor.set(row, d, PRICE_CHANNEL, level.price / price_scale);
                }
                if options.size {
                    tensor.set(row, d, SIZE_CHANNEL, level.quantity / size_scale);
                }
            }
        };
        write(row, &snapshot.bids);
        write(lookback + row, &snapshot.asks);
    }

    Ok(tensor)
}
