//! Snapshot validation helpers.

use crate::error::DataError;
use tranche_types::{BookLevel, BookSnapshot};

/// Validates a sequence of order-book snapshots.
///
/// # Errors
/// - [`DataError::EmptyData`] when `snapshots` is empty.
/// - [`DataError::CorruptData`] on non-finite or non-positive prices, negative
///   quantities, unordered levels or decreasing timestamps.
/// - [`DataError::InvalidSpread`] when the best bid is not below the best ask.
pub fn validate_snapshots(snapshots: &[BookSnapshot]) -> Result<(), DataError> {
    if snapshots.is_empty() {
        return Err(DataError::EmptyData);
    }

    for (i, snapshot) in snapshots.iter().enumerate() {
        if i > 0 && snapshot.timestamp_ns < snapshots[i - 1].timestamp_ns {
            return Err(DataError::CorruptData(format!(
                "Non-monotonic timestamp at index {i}: {} < {}",
                snapshot.timestamp_ns,
                snapshots[i - 1].timestamp_ns
            )));
        }

        validate_levels(i, "bid", &snapshot.bids, |prev, next| next < prev)?;
        validate_levels(i, "ask", &snapshot.asks, |prev, next| next > prev)?;
        validate_spread(i, snapshot)?;
    }

    Ok(())
}

fn validate_levels(
    index: usize,
    label: &str,
    levels: &[BookLevel],
    ordered: impl Fn(f64, f64) -> bool,
) -> Result<(), DataError> {
    for (k, level) in levels.iter().enumerate() {
        if !level.price.is_finite() || !level.quantity.is_finite() {
            return Err(DataError::CorruptData(format!(
                "NaN/Inf {label} level {k} at index {index}: {level:?}"
            )));
        }
        if level.price <= 0.0 {
            return Err(DataError::CorruptData(format!(
                "Non-positive {label} price {} at index {index}",
                level.price
            )));
        }
        if level.quantity < 0.0 {
            return Err(DataError::CorruptData(format!(
                "Negative {label} quantity {} at index {index}",
                level.quantity
            )));
        }
        if k > 0 && !ordered(levels[k - 1].price, level.price) {
            return Err(DataError::CorruptData(format!(
                "Unordered {label} levels at index {index}: {} then {}",
                levels[k - 1].price, level.price
            )));
        }
    }
    Ok(())
}

/// Validates that the best bid lies strictly below the best ask.
///
/// # Errors
/// - [`DataError::InvalidSpread`] on a crossed or locked book.
pub fn validate_spread(index: usize, snapshot: &BookSnapshot) -> Result<(), DataError> {
    if let (Some(bid), Some(ask)) = (snapshot.best_bid(), snapshot.best_ask())
        && bid >= ask
    {
        return Err(DataError::InvalidSpread(format!(
            "Invalid spread at index {index}: best_bid={bid} >= best_ask={ask}"
        )));
    }
    Ok(())
}
