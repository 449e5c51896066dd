//! Tranche Data
//!
//! Order-book snapshot source for the execution environment: validated
//! in-memory storage, random episode sampling and bid/ask feature
//! engineering.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

/// Data-layer error types.
pub mod error;
/// Bid/ask feature tensor.
pub mod features;
/// Order-book source abstraction.
pub mod source;
/// In-memory order book.
pub mod store;
/// Snapshot validation helpers.
pub mod validation;

/// Re-export: data-layer error type.
pub use error::DataError;
/// Re-export: feature switches.
pub use features::FeatureOptions;
/// Re-export: order-book source trait.
pub use source::OrderbookSource;
/// Re-export: in-memory order book.
pub use store::Orderbook;
/// Re-export: snapshot validation.
pub use validation::validate_snapshots;
