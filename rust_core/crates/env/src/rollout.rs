//! Evaluation rollouts with fixed policies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tranche_data::OrderbookSource;
use tranche_execution::{Execution, MatchEngine};
use tranche_types::{CoreError, Observation};

use crate::env::{Action, ExecutionEnv, StepInfo};
use crate::error::EnvError;
use crate::spec::ActionSpace;

/// Action selection for rollouts.
pub trait Policy {
    /// Chooses the next action.
    fn select_action(&mut self, observation: &Observation, action_space: &ActionSpace) -> Action;
}

/// Always picks the same level index, clamped to the action space.
#[derive(Debug, Clone, Copy)]
pub struct FixedLevelPolicy {
    index: usize,
}

impl FixedLevelPolicy {
    /// Creates a policy for level `index`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Policy for FixedLevelPolicy {
    fn select_action(&mut self, _observation: &Observation, action_space: &ActionSpace) -> Action {
        Action::Level(self.index.min(action_space.n.saturating_sub(1)))
    }
}

/// Always sends market orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketPolicy;

impl Policy for MarketPolicy {
    fn select_action(&mut self, _observation: &Observation, _action_space: &ActionSpace) -> Action {
        Action::Market
    }
}

/// Uniformly random level, seeded.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Creates a policy seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_action(&mut self, _observation: &Observation, action_space: &ActionSpace) -> Action {
        if action_space.n == 0 {
            return Action::Market;
        }
        Action::Level(self.rng.gen_range(0..action_space.n))
    }
}

/// One step of a rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number, starting at 0
    pub step: usize,
    /// Time bucket the action was taken in
    pub t: f64,
    /// Inventory bucket the action was taken in
    pub i: f64,
    /// Action taken
    pub action: Action,
    /// Reward received
    pub reward: f64,
    /// Episode finished after this step
    pub done: bool,
    /// Step information
    pub info: StepInfo,
}

/// Outcome of one rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Steps taken
    pub steps: usize,
    /// Sum of rewards
    pub total_reward: f64,
    /// Episode reached a terminal state
    pub done: bool,
    /// Inventory bucket at the end
    pub final_inventory: f64,
    /// Quantity executed over the episode
    pub executed_quantity: f64,
    /// Per-step records
    pub records: Vec<StepRecord>,
}

impl EpisodeSummary {
    /// Serializes the summary to JSON.
    ///
    /// # Errors
    /// Returns [`EnvError::Core`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EnvError> {
        Ok(serde_json::to_string(self).map_err(CoreError::from)?)
    }
}

/// Resets `env` and steps it with `policy` until the episode ends or
/// `max_steps` steps were taken.
///
/// # Errors
/// Propagates reset and step errors.
pub fn run_episode<S, M, P>(
    env: &mut ExecutionEnv<S, M>,
    policy: &mut P,
    max_steps: usize,
) -> Result<EpisodeSummary, EnvError>
where
    S: OrderbookSource,
    M: MatchEngine<S>,
    P: Policy + ?Sized,
{
    let mut observation = env.reset()?;
    let action_space = env.action_space();
    let mut records = Vec::new();
    let mut total_reward = 0.0;
    let mut done = false;

    for step in 0..max_steps {
        let action = policy.select_action(&observation, &action_space);
        let result = env.step(action)?;
        total_reward += result.reward;
        done = result.done;
        records.push(StepRecord {
            step,
            t: observation.t,
            i: observation.i,
            action,
            reward: result.reward,
            done,
            info: result.info,
        });
        observation = result.observation;
        if done {
            break;
        }
    }

    let executed_quantity = env.execution().map_or(0.0, Execution::qty_executed);
    tracing::info!(
        steps = records.len(),
        total_reward,
        done,
        executed_quantity,
        "episode finished"
    );

    Ok(EpisodeSummary {
        steps: records.len(),
        total_reward,
        done,
        final_inventory: observation.i,
        executed_quantity,
        records,
    })
}
