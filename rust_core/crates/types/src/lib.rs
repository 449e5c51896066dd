//! Tranche Types
//!
//! Core data structures for the optimal-execution environment: order-book
//! snapshots, order requests, simulated fills, the discretized state and
//! the environment configuration.

#![deny(clippy::all)]

pub mod book;
pub mod config;
pub mod error;
pub mod order;
pub mod state;
pub mod trade;

// Re-export main types for convenience
pub use book::{BookLevel, BookSnapshot};
pub use config::{DEFAULT_QTY_TOLERANCE, EnvConfig, GridSpec, LoggingConfig, RunMode};
pub use error::CoreError;
pub use order::{OrderRequest, OrderSide, OrderType};
pub use state::{DiscretizedState, FeatureTensor, Observation};
pub use trade::{CounterTrade, total_quantity, vwap};
