//! Environment error types.

use thiserror::Error;

use crate::status::EpisodeStatus;

/// Errors that can occur while configuring or stepping the environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// JSON/YAML config parse error
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// No order book attached
    #[error("no order book attached")]
    MissingOrderbook,

    /// `step` called before `reset`
    #[error("environment not reset")]
    NotReset,

    /// `step` called after the episode finished
    #[error("episode already terminated, call reset")]
    EpisodeTerminated,

    /// Action index outside the action space
    #[error("invalid action {index}: action space has {n} actions")]
    InvalidAction {
        /// Requested index
        index: usize,
        /// Number of actions
        n: usize,
    },

    /// Value not found on its grid
    #[error("value {value} is not on the grid")]
    OffGrid {
        /// Offending value
        value: f64,
    },

    /// Episode status transition not allowed
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: EpisodeStatus,
        /// Requested status
        to: EpisodeStatus,
    },

    /// Order-book error
    #[error("data error: {0}")]
    Data(#[from] tranche_data::DataError),

    /// Matching error
    #[error("execution error: {0}")]
    Execution(#[from] tranche_execution::ExecutionError),

    /// Core error (config loading)
    #[error("core error: {0}")]
    Core(#[from] tranche_types::CoreError),
}

impl EnvError {
    /// Returns true if this is a config parse/validation error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EnvError::ConfigParse(_) | EnvError::ConfigValidation(_) | EnvError::MissingOrderbook
        )
    }

    /// Returns the error category.
    /// Categories: `config`, `market_data`, `execution`, `protocol`, `runtime`
    #[must_use]
    pub fn error_category(&self) -> &'static str {
        match self {
            EnvError::ConfigParse(_) | EnvError::ConfigValidation(_) | EnvError::MissingOrderbook => {
                "config"
            }

            EnvError::Data(_) => "market_data",

            EnvError::Execution(_) => "execution",

            EnvError::NotReset
            | EnvError::EpisodeTerminated
            | EnvError::InvalidAction { .. }
            | EnvError::InvalidTransition { .. } => "protocol",

            EnvError::OffGrid { .. } | EnvError::Core(_) => "runtime",
        }
    }
}
