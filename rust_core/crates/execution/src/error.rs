//! Error types for the execution crate.

use thiserror::Error;
use tranche_data::DataError;

/// Errors that can occur during matching.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Invalid order parameters
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Snapshot has no best ask to anchor the reward
    #[error("no reference price in snapshot {index}")]
    MissingReferencePrice {
        /// Snapshot index
        index: usize,
    },

    /// Order-book access failed
    #[error("order book error: {0}")]
    Data(#[from] DataError),
}
