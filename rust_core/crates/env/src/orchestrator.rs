//! Execution orchestration: owns the in-flight order and drives matching.

use tranche_data::OrderbookSource;
use tranche_execution::{Execution, MatchEngine};
use tranche_types::{CounterTrade, DiscretizedState};

use crate::error::EnvError;
use crate::spec::EnvSpec;
use crate::synthesizer::{determine_runtime, synthesize};

/// Outcome of one orchestrated matching run.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Execution after matching, index advanced
    pub execution: Execution,
    /// Fills of this run only
    pub counter_trades: Vec<CounterTrade>,
    /// Open quantity of the current order
    pub qty_not_executed: f64,
}

/// Creates or updates the execution for a step and runs it through the
/// matching engine on a disposable copy of the order book.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOrchestrator<M> {
    matcher: M,
}

impl<M> ExecutionOrchestrator<M> {
    /// Creates an orchestrator around `matcher`.
    #[must_use]
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// The matching engine.
    #[must_use]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Builds a new execution when `context` is `None`, otherwise updates it
    /// in place keeping its reference price, then matches it.
    ///
    /// A new execution prices its limit order against the snapshot at
    /// `index`. An update prices against the snapshot the execution already
    /// holds and only then installs the snapshot at `index`.
    ///
    /// # Errors
    /// Returns synthesis, order-book or matching errors.
    pub fn create_or_update<S>(
        &self,
        context: Option<Execution>,
        level: Option<f64>,
        state: &DiscretizedState,
        index: usize,
        spec: &EnvSpec,
        orderbook: &S,
    ) -> Result<Dispatch, EnvError>
    where
        S: OrderbookSource,
        M: MatchEngine<S>,
    {
        let runtime = determine_runtime(state.t(), spec.time())?;
        let snapshot = orderbook.state(index)?.clone();

        let created = context.is_none();
        let mut execution = match context {
            None => {
                let order = synthesize(state, level, runtime, &snapshot, spec.side(), index)?;
                Execution::new(level, runtime, state.clone(), order, snapshot, index)?
            }
            Some(mut execution) => {
                // Priced against the snapshot held since the previous step.
                let order = synthesize(
                    state,
                    level,
                    runtime,
                    execution.orderbook_state(),
                    spec.side(),
                    index,
                )?;
                execution.update(level, runtime, state.clone(), order, snapshot, index);
                execution
            }
        };

        crate::step_event!(
            spec.config().logging.enable_step_logging,
            created,
            level = ?level,
            order_type = %execution.order().order_type(),
            t = state.t(),
            runtime,
            i = state.i(),
            "execution prepared"
        );

        let counter_trades = self.matcher.run(&mut execution, orderbook.clone())?;
        let qty_not_executed = execution.qty_not_executed();

        Ok(Dispatch {
            execution,
            counter_trades,
            qty_not_executed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tranche_data::Orderbook;
    use tranche_execution::BookWalkMatcher;
    use tranche_types::{BookLevel, BookSnapshot, EnvConfig, FeatureTensor, GridSpec, OrderSide};

    fn orderbook() -> Orderbook {
        let snapshots = (0..4)
            .map(|k| {
                BookSnapshot::new(
                    k * 10_000_000_000,
                    vec![BookLevel::new(99.0, 0.5), BookLevel::new(98.0, 0.5)],
                    vec![BookLevel::new(101.0, 0.5), BookLevel::new(102.0, 0.5)],
                )
            })
            .collect();
        Orderbook::new(snapshots).unwrap()
    }

    fn spec() -> EnvSpec {
        let config = EnvConfig {
            levels: GridSpec::new(-2.0, 2.0, 1.0),
            time: GridSpec::new(0.0, 20.0, 10.0),
            inventory: GridSpec::new(0.0, 1.0, 0.5),
            lookback: 1,
            book_size: 2,
            ..EnvConfig::default()
        };
        EnvSpec::new(config).unwrap()
    }

    fn state(t: f64, i: f64) -> DiscretizedState {
        DiscretizedState::new(t, i, FeatureTensor::zeros([2, 2, 2]))
    }

    #[test]
    fn test_create_then_update_keeps_reference() {
        let orchestrator = ExecutionOrchestrator::new(BookWalkMatcher::new());
        let ob = orderbook();

        // Passive sell at the best ask never trades against bids at 99.
        let first = orchestrator
            .create_or_update(None, Some(0.0), &state(20.0, 1.0), 0, &spec(), &ob)
            .unwrap();
        assert!(first.counter_trades.is_empty());
        assert_eq!(first.qty_not_executed, 1.0);
        assert_eq!(first.execution.reference_price(), 101.0);
        assert_eq!(first.execution.orderbook_index(), 1);

        // Crossing level -1 sells into the best bid of the current snapshot.
        let second = orchestrator
            .create_or_update(Some(first.execution), Some(-1.0), &state(10.0, 1.0), 1, &spec(), &ob)
            .unwrap();
        assert_eq!(second.counter_trades.len(), 1);
        assert_eq!(second.qty_not_executed, 0.5);
        assert_eq!(second.execution.reference_price(), 101.0);
        assert_eq!(second.execution.order().price(), Some(99.0));
    }

    #[test]
    fn test_update_prices_against_held_snapshot() {
        // Prices rise by 5 every 10s.
        let snapshots = (0..4i64)
            .map(|k| {
                let shift = 5.0 * k as f64;
                BookSnapshot::new(
                    k * 10_000_000_000,
                    vec![BookLevel::new(99.0 + shift, 0.5), BookLevel::new(98.0 + shift, 0.5)],
                    vec![BookLevel::new(101.0 + shift, 0.5), BookLevel::new(102.0 + shift, 0.5)],
                )
            })
            .collect();
        let ob = Orderbook::new(snapshots).unwrap();
        let spec = spec().with_side(OrderSide::Buy);
        let orchestrator = ExecutionOrchestrator::new(BookWalkMatcher::new());

        // Passive buy at the best bid of snapshot 0, asks never come down to it.
        let first = orchestrator
            .create_or_update(None, Some(0.0), &state(20.0, 1.0), 0, &spec, &ob)
            .unwrap();
        assert_eq!(first.execution.order().price(), Some(99.0));
        assert_eq!(first.execution.orderbook_index(), 1);

        let second = orchestrator
            .create_or_update(Some(first.execution), Some(1.0), &state(10.0, 1.0), 1, &spec, &ob)
            .unwrap();
        assert_eq!(second.execution.order().price(), Some(98.0));
        assert_eq!(second.execution.orderbook_state().timestamp_ns, 10_000_000_000);

        // The next update sees snapshot 1, installed above.
        let third = orchestrator
            .create_or_update(Some(second.execution), Some(0.0), &state(10.0, 1.0), 2, &spec, &ob)
            .unwrap();
        assert_eq!(third.execution.order().price(), Some(104.0));
    }

    #[test]
    fn test_zero_time_sends_market() {
        let orchestrator = ExecutionOrchestrator::new(BookWalkMatcher::new());
        let ob = orderbook();
        let dispatch = orchestrator
            .create_or_update(None, Some(2.0), &state(0.0, 1.0), 0, &spec(), &ob)
            .unwrap();
        assert!(dispatch.execution.order().is_market());
        assert_eq!(dispatch.qty_not_executed, 0.0);
    }

    #[test]
    fn test_shared_book_is_not_mutated() {
        let orchestrator = ExecutionOrchestrator::new(BookWalkMatcher::new());
        let ob = orderbook();
        orchestrator
            .create_or_update(None, None, &state(20.0, 1.0), 0, &spec(), &ob)
            .unwrap();
        assert_eq!(ob, orderbook());
    }
}
