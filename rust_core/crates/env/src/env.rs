//! Episode controller implementing the reset/step protocol.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tranche_data::OrderbookSource;
use tranche_execution::{BookWalkMatcher, Execution, MatchEngine};
use tranche_types::{DiscretizedState, Observation, OrderType};

use crate::error::EnvError;
use crate::orchestrator::ExecutionOrchestrator;
use crate::projector::{make_features, project};
use crate::spec::{ActionSpace, EnvSpec, ObservationSpace};
use crate::status::EpisodeStatus;

/// Agent action: an index into the price-level grid, or the market sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Limit order at the level with this index
    Level(usize),
    /// Market order, no level
    Market,
}

impl From<usize> for Action {
    fn from(index: usize) -> Self {
        Action::Level(index)
    }
}

impl From<Option<usize>> for Action {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Action::Market, Action::Level)
    }
}

/// Auxiliary step information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Executed quantity of this step over the largest inventory
    pub volume_ratio: f64,
    /// Number of counter-trades of this step
    pub counter_trades: usize,
    /// Seconds the order was allowed to rest
    pub runtime: f64,
    /// Type of the order sent
    pub order_type: OrderType,
    /// Order-book index after matching
    pub orderbook_index: usize,
}

/// Result of [`ExecutionEnv::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Observation of the next state
    pub observation: Observation,
    /// Weighted reward of this step
    pub reward: f64,
    /// Episode finished
    pub done: bool,
    /// Auxiliary information
    pub info: StepInfo,
}

/// Optimal-execution environment over an order-book source.
///
/// Episodes start at the largest time and inventory buckets on a randomly
/// sampled snapshot and end once the order is filled or no inventory is
/// left.
#[derive(Debug)]
pub struct ExecutionEnv<S, M = BookWalkMatcher> {
    spec: EnvSpec,
    orderbook: Option<S>,
    orchestrator: ExecutionOrchestrator<M>,
    rng: ChaCha8Rng,
    status: EpisodeStatus,
    state: Option<DiscretizedState>,
    orderbook_index: Option<usize>,
    execution: Option<Execution>,
}

impl<S, M> ExecutionEnv<S, M> {
    /// Creates an environment without order book.
    ///
    /// Episode sampling is seeded from the config, or from the clock when no
    /// seed is configured.
    #[must_use]
    pub fn new(spec: EnvSpec, matcher: M) -> Self {
        let seed = spec.config().rng_seed.unwrap_or_else(random_seed);
        Self {
            spec,
            orderbook: None,
            orchestrator: ExecutionOrchestrator::new(matcher),
            rng: ChaCha8Rng::seed_from_u64(seed),
            status: EpisodeStatus::Uninitialized,
            state: None,
            orderbook_index: None,
            execution: None,
        }
    }

    /// Attaches the order-book source. A running episode is dropped.
    pub fn set_orderbook(&mut self, orderbook: S) {
        if self.status == EpisodeStatus::Ready {
            tracing::warn!("order book replaced mid-episode, episode dropped");
        }
        self.orderbook = Some(orderbook);
        self.clear_episode();
    }

    /// Swaps the environment descriptor. A running episode is dropped.
    pub fn reconfigure(&mut self, spec: EnvSpec) {
        if self.status == EpisodeStatus::Ready {
            tracing::warn!("environment reconfigured mid-episode, episode dropped");
        }
        if spec.config().rng_seed != self.spec.config().rng_seed
            && let Some(seed) = spec.config().rng_seed
        {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.spec = spec;
        self.clear_episode();
    }

    /// Reseeds episode sampling.
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// No-op.
    #[allow(clippy::unused_self)]
    pub fn render(&self) {}

    /// Current descriptor
    #[must_use]
    pub fn spec(&self) -> &EnvSpec {
        &self.spec
    }

    /// Action space
    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        self.spec.action_space()
    }

    /// Observation space
    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        self.spec.observation_space()
    }

    /// Episode status
    #[must_use]
    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Current discretized state
    #[must_use]
    pub fn state(&self) -> Option<&DiscretizedState> {
        self.state.as_ref()
    }

    /// In-flight execution
    #[must_use]
    pub fn execution(&self) -> Option<&Execution> {
        self.execution.as_ref()
    }

    /// Current order-book index
    #[must_use]
    pub fn orderbook_index(&self) -> Option<usize> {
        self.orderbook_index
    }

    /// Attached order book
    #[must_use]
    pub fn orderbook(&self) -> Option<&S> {
        self.orderbook.as_ref()
    }

    fn clear_episode(&mut self) {
        self.state = None;
        self.orderbook_index = None;
        self.execution = None;
        self.status = EpisodeStatus::Uninitialized;
    }
}

impl<S, M> ExecutionEnv<S, M>
where
    S: OrderbookSource,
    M: MatchEngine<S>,
{
    /// Starts a new episode and returns its first observation.
    ///
    /// Any previous episode is dropped, also when the reset fails.
    ///
    /// # Errors
    /// - [`EnvError::MissingOrderbook`] without order book.
    /// - [`EnvError::Data`] if the book is too short for the time budget and
    ///   lookback, or the sampled snapshot cannot be featurized.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        match self.begin_episode() {
            Ok(observation) => Ok(observation),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    category = err.error_category(),
                    "reset failed, episode dropped"
                );
                self.clear_episode();
                Err(err)
            }
        }
    }

    fn begin_episode(&mut self) -> Result<Observation, EnvError> {
        let orderbook = self.orderbook.as_ref().ok_or(EnvError::MissingOrderbook)?;
        let t = self.spec.max_time();
        let i = self.spec.max_inventory();

        let (_, index) = orderbook.random_state(t, self.spec.lookback(), &mut self.rng)?;
        let features = make_features(orderbook, index, &self.spec)?;
        let state = DiscretizedState::new(t, i, features);
        let observation = state.to_observation();

        tracing::info!(orderbook_index = index, t, i, "episode reset");

        self.execution = None;
        self.orderbook_index = Some(index);
        self.state = Some(state);
        self.status.transition(EpisodeStatus::Ready)?;
        Ok(observation)
    }

    /// Advances the episode by one action.
    ///
    /// A failure while matching or projecting abandons the episode; call
    /// [`reset`](Self::reset) before stepping again.
    ///
    /// # Errors
    /// - [`EnvError::NotReset`] / [`EnvError::EpisodeTerminated`] outside a
    ///   running episode.
    /// - [`EnvError::InvalidAction`] for an index outside the action space.
    /// - Order-book and matching errors.
    pub fn step(&mut self, action: impl Into<Action>) -> Result<StepResult, EnvError> {
        let action = action.into();
        self.status.ensure_steppable()?;

        let level = match action {
            Action::Level(index) => Some(self.spec.levels().get(index).ok_or(
                EnvError::InvalidAction {
                    index,
                    n: self.spec.action_space().n,
                },
            )?),
            Action::Market => None,
        };

        match self.advance(level) {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    category = err.error_category(),
                    "step failed, episode abandoned"
                );
                self.clear_episode();
                Err(err)
            }
        }
    }

    fn advance(&mut self, level: Option<f64>) -> Result<StepResult, EnvError> {
        let orderbook = self.orderbook.as_ref().ok_or(EnvError::MissingOrderbook)?;
        let state = self.state.as_ref().ok_or(EnvError::NotReset)?;
        let index = self.orderbook_index.ok_or(EnvError::NotReset)?;

        let dispatch = self.orchestrator.create_or_update(
            self.execution.take(),
            level,
            state,
            index,
            &self.spec,
            orderbook,
        )?;
        let execution = dispatch.execution;

        let next = project(&execution, &self.spec, orderbook)?;
        let done = execution.is_filled(self.spec.qty_tolerance()) || next.i() == 0.0;
        let (reward, volume_ratio) =
            execution.calculate_reward_weighted(&dispatch.counter_trades, self.spec.max_inventory());

        crate::step_event!(
            self.spec.config().logging.enable_step_logging,
            trades = dispatch.counter_trades.len(),
            reward,
            volume_ratio,
            qty_not_executed = dispatch.qty_not_executed,
            t_next = next.t(),
            i_next = next.i(),
            done,
            "execution run"
        );

        let info = StepInfo {
            volume_ratio,
            counter_trades: dispatch.counter_trades.len(),
            runtime: execution.runtime(),
            order_type: execution.order().order_type(),
            orderbook_index: execution.orderbook_index(),
        };
        let observation = next.to_observation();

        self.orderbook_index = Some(execution.orderbook_index());
        self.execution = Some(execution);
        self.state = Some(next);
        self.status.transition(if done {
            EpisodeStatus::Terminal
        } else {
            EpisodeStatus::Ready
        })?;

        Ok(StepResult {
            observation,
            reward,
            done,
            info,
        })
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|dur| u64::try_from(dur.as_nanos()).ok())
        .unwrap_or(42)
}
