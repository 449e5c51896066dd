//! Tranche Env
//!
//! Discrete-time, discrete-action environment for executing a parent order
//! against historical order-book snapshots. An agent picks a price-level
//! offset each step; the environment turns it into a limit or market order,
//! simulates matching, snaps the remaining quantity onto the inventory grid
//! and counts the time budget down one bucket.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]

/// Logs a per-step event at `info` when step logging is enabled, `debug`
/// otherwise.
macro_rules! step_event {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}
pub(crate) use step_event;

pub mod env;
pub mod error;
pub mod grid;
pub mod orchestrator;
pub mod projector;
pub mod rollout;
pub mod runner;
pub mod spec;
pub mod status;
pub mod synthesizer;

pub use env::{Action, ExecutionEnv, StepInfo, StepResult};
pub use error::EnvError;
pub use grid::Grid;
pub use orchestrator::{Dispatch, ExecutionOrchestrator};
pub use rollout::{
    EpisodeSummary, FixedLevelPolicy, MarketPolicy, Policy, RandomPolicy, StepRecord, run_episode,
};
pub use runner::{build_env_from_json, build_env_from_path, validate_config};
pub use spec::{ActionSpace, EnvSpec, ObservationSpace};
pub use status::EpisodeStatus;
