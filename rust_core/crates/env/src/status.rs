//! Episode status state machine.
//!
//! ```text
//! Uninitialized ──reset──► Ready ──done──► Terminal
//!       ▲                  │  ▲               │
//!       └───reconfigure────┘  └─────reset─────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Lifecycle of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EpisodeStatus {
    /// No episode started, or the environment was reconfigured
    #[default]
    Uninitialized,
    /// Episode running, `step` accepted
    Ready,
    /// Episode finished, only `reset` accepted
    Terminal,
}

impl EpisodeStatus {
    /// Returns the allowed transitions from the current status.
    #[must_use]
    pub fn allowed_transitions(&self) -> &[EpisodeStatus] {
        match self {
            EpisodeStatus::Uninitialized => &[EpisodeStatus::Ready],
            EpisodeStatus::Ready => &[
                EpisodeStatus::Ready,
                EpisodeStatus::Terminal,
                EpisodeStatus::Uninitialized,
            ],
            EpisodeStatus::Terminal => &[EpisodeStatus::Ready, EpisodeStatus::Uninitialized],
        }
    }

    /// Checks if the episode has finished.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, EpisodeStatus::Terminal)
    }

    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub fn can_transition_to(&self, target: EpisodeStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Moves to `target`.
    ///
    /// # Errors
    /// Returns [`EnvError::InvalidTransition`] if the move is not allowed.
    pub fn transition(&mut self, target: EpisodeStatus) -> Result<(), EnvError> {
        if !self.can_transition_to(target) {
            return Err(EnvError::InvalidTransition {
                from: *self,
                to: target,
            });
        }
        *self = target;
        Ok(())
    }

    /// Checks that `step` may run in this status.
    ///
    /// # Errors
    /// - [`EnvError::NotReset`] before the first `reset`.
    /// - [`EnvError::EpisodeTerminated`] after the episode finished.
    pub fn ensure_steppable(&self) -> Result<(), EnvError> {
        match self {
            EpisodeStatus::Uninitialized => Err(EnvError::NotReset),
            EpisodeStatus::Terminal => Err(EnvError::EpisodeTerminated),
            EpisodeStatus::Ready => Ok(()),
        }
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeStatus::Uninitialized => write!(f, "Uninitialized"),
            EpisodeStatus::Ready => write!(f, "Ready"),
            EpisodeStatus::Terminal => write!(f, "Terminal"),
        }
    }
}
