//! Execution context of one parent order.

use tranche_types::{
    BookSnapshot, CounterTrade, DiscretizedState, OrderRequest, total_quantity, vwap,
};

use crate::error::ExecutionError;
use crate::reward::reward_weighted;

/// Mutable record threaded through the steps of an in-flight order.
///
/// The reference price is captured once at creation and survives every
/// [`Execution::update`]; `trades` accumulates across all orders of the
/// episode while `order_executed` only covers the current order.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    level: Option<f64>,
    runtime: f64,
    state: DiscretizedState,
    order: OrderRequest,
    orderbook_state: BookSnapshot,
    orderbook_index: usize,
    reference_price: f64,
    trades: Vec<CounterTrade>,
    order_executed: f64,
}

impl Execution {
    /// Creates a new execution, anchoring the reference price at the best ask
    /// of `orderbook_state`.
    ///
    /// # Errors
    /// Returns [`ExecutionError::MissingReferencePrice`] if the snapshot has
    /// no asks.
    pub fn new(
        level: Option<f64>,
        runtime: f64,
        state: DiscretizedState,
        order: OrderRequest,
        orderbook_state: BookSnapshot,
        orderbook_index: usize,
    ) -> Result<Self, ExecutionError> {
        let reference_price = orderbook_state
            .best_ask()
            .ok_or(ExecutionError::MissingReferencePrice {
                index: orderbook_index,
            })?;

        Ok(Self {
            level,
            runtime,
            state,
            order,
            orderbook_state,
            orderbook_index,
            reference_price,
            trades: Vec::new(),
            order_executed: 0.0,
        })
    }

    /// Replaces the order for the next step. The reference price and past
    /// trades are kept.
    pub fn update(
        &mut self,
        level: Option<f64>,
        runtime: f64,
        state: DiscretizedState,
        order: OrderRequest,
        orderbook_state: BookSnapshot,
        orderbook_index: usize,
    ) {
        self.level = level;
        self.runtime = runtime;
        self.state = state;
        self.order = order;
        self.orderbook_state = orderbook_state;
        self.orderbook_index = orderbook_index;
        self.order_executed = 0.0;
    }

    /// Books the fills of one matching run and moves to `orderbook_index`.
    pub fn record_fills(&mut self, fills: &[CounterTrade], orderbook_index: usize) {
        self.order_executed += total_quantity(fills);
        self.trades.extend_from_slice(fills);
        self.orderbook_index = orderbook_index;
    }

    /// Chosen price level, `None` for the market sentinel
    #[must_use]
    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Seconds the current order may rest
    #[must_use]
    pub fn runtime(&self) -> f64 {
        self.runtime
    }

    /// State the current order was derived from
    #[must_use]
    pub fn state(&self) -> &DiscretizedState {
        &self.state
    }

    /// Current order
    #[must_use]
    pub fn order(&self) -> &OrderRequest {
        &self.order
    }

    /// Snapshot the current order was priced against
    #[must_use]
    pub fn orderbook_state(&self) -> &BookSnapshot {
        &self.orderbook_state
    }

    /// Current order-book index
    #[must_use]
    pub fn orderbook_index(&self) -> usize {
        self.orderbook_index
    }

    /// Best ask at creation
    #[must_use]
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// All fills of the parent order
    #[must_use]
    pub fn trades(&self) -> &[CounterTrade] {
        &self.trades
    }

    /// Quantity executed over the whole parent order.
    #[must_use]
    pub fn qty_executed(&self) -> f64 {
        total_quantity(&self.trades)
    }

    /// Quantity of the current order still open, never negative.
    #[must_use]
    pub fn qty_not_executed(&self) -> f64 {
        (self.order.quantity() - self.order_executed).max(0.0)
    }

    /// Returns `true` once the open quantity is within `tolerance`.
    #[must_use]
    pub fn is_filled(&self, tolerance: f64) -> bool {
        self.qty_not_executed() <= tolerance
    }

    /// Volume-weighted price over all fills.
    #[must_use]
    pub fn avg_price(&self) -> Option<f64> {
        vwap(&self.trades)
    }

    /// `(reward, volume_ratio)` of `trades` against this execution's
    /// reference price.
    #[must_use]
    pub fn calculate_reward_weighted(
        &self,
        trades: &[CounterTrade],
        max_inventory: f64,
    ) -> (f64, f64) {
        reward_weighted(trades, self.reference_price, self.order.side(), max_inventory)
    }
}
