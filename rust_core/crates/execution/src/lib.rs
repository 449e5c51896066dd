//! # Tranche Execution
//!
//! Matching simulation and reward for the execution environment.
//!
//! ## Overview
//!
//! - **Execution context**: the in-flight parent order with its reference
//!   price and accumulated counter-trades
//! - **Matching**: the [`MatchEngine`] seam and the [`BookWalkMatcher`] that
//!   walks historical snapshots
//! - **Reward**: volume-weighted price improvement against the reference
//!
//! ## Determinism
//!
//! Matching is a pure function of the order, the runtime and the order-book
//! copy it receives.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

pub mod error;
pub mod execution;
pub mod matching;
pub mod reward;

/// Execution error type.
pub use error::ExecutionError;
/// Execution context.
pub use execution::Execution;
/// Matching engine seam and implementation.
pub use matching::{BookWalkMatcher, MatchEngine};
/// Weighted reward.
pub use reward::reward_weighted;
