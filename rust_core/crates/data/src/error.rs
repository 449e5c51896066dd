//! Data-layer error types.

use thiserror::Error;
use tranche_types::OrderSide;

/// Errors that can occur while validating or reading order-book data.
#[derive(Debug, Error)]
pub enum DataError {
    /// No snapshots were supplied.
    #[error("Empty data")]
    EmptyData,

    /// A snapshot index is outside the order book.
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of snapshots.
        len: usize,
    },

    /// Not enough snapshots to proceed.
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Required number of snapshots.
        required: usize,
        /// Available number of snapshots.
        available: usize,
    },

    /// Data violated a snapshot invariant.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Best bid is not below best ask.
    #[error("Invalid spread: {0}")]
    InvalidSpread(String),

    /// A book side needed for pricing has no levels.
    #[error("Empty {side} side at index {index}")]
    EmptySide {
        /// Snapshot index.
        index: usize,
        /// Side whose levels are missing (`Buy` = bids).
        side: OrderSide,
    },
}
