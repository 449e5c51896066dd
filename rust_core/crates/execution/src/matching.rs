//! Matching simulation against historical order-book snapshots.
//!
//! The matcher receives a disposable copy of the order-book source and may
//! consume liquidity in it; fills are reported as [`CounterTrade`]s.

use std::ops::Range;

use tranche_data::OrderbookSource;
use tranche_types::{BookSnapshot, CounterTrade, OrderSide};

use crate::error::ExecutionError;
use crate::execution::Execution;

/// Matching engine seam.
pub trait MatchEngine<S: OrderbookSource> {
    /// Runs the current order of `execution` against `book`.
    ///
    /// Fills and the advanced order-book index are booked on `execution`;
    /// the fills of this run are also returned.
    ///
    /// # Errors
    /// Returns an error for invalid orders or order-book access failures.
    fn run(&self, execution: &mut Execution, book: S) -> Result<Vec<CounterTrade>, ExecutionError>;
}

/// Walks snapshots forward and takes resting liquidity on the opposite side.
///
/// | Order  | Snapshots                                     | Takes                     |
/// |--------|-----------------------------------------------|---------------------------|
/// | LIMIT  | from the current index, within `runtime` secs | levels crossing the limit |
/// | MARKET | from the current index to the end of data     | every level               |
///
/// Liquidity taken at a price is removed from that price in every later
/// snapshot of the run. The new index is the last snapshot examined.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookWalkMatcher;

impl BookWalkMatcher {
    /// Creates a new matcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S: OrderbookSource> MatchEngine<S> for BookWalkMatcher {
    fn run(
        &self,
        execution: &mut Execution,
        mut book: S,
    ) -> Result<Vec<CounterTrade>, ExecutionError> {
        let order = execution.order().clone();
        let quantity = order.quantity();
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(ExecutionError::InvalidOrder(format!(
                "quantity must be finite and non-negative, got {quantity}"
            )));
        }
        if let Some(price) = order.price()
            && !price.is_finite()
        {
            return Err(ExecutionError::InvalidOrder(format!(
                "limit price must be finite, got {price}"
            )));
        }

        let start = execution.orderbook_index();
        let window: Range<usize> = match order.price() {
            Some(_) => book.index_window(start, execution.runtime())?,
            None => {
                // Validates the start index.
                book.state(start)?;
                start..book.len()
            }
        };

        let side = order.side();
        let mut remaining = quantity;
        let mut consumed: Vec<(f64, f64)> = Vec::new();
        let mut fills = Vec::new();
        let mut last = start;

        for index in window {
            last = index;
            let snapshot = book.state_mut(index)?;
            remove_consumed(snapshot, side, &consumed);
            remaining = take_liquidity(
                snapshot,
                side,
                order.price(),
                remaining,
                &mut consumed,
                &mut fills,
            );
            if remaining <= 0.0 {
                break;
            }
        }

        execution.record_fills(&fills, last);
        tracing::debug!(
            order = %order,
            fills = fills.len(),
            remaining,
            start,
            end = last,
            "order matched"
        );
        Ok(fills)
    }
}

fn same_price(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Levels an order of `side` trades against.
fn contra_side(side: OrderSide) -> OrderSide {
    side.opposite()
}

fn crosses(side: OrderSide, level_price: f64, limit: Option<f64>) -> bool {
    match (limit, side) {
        (None, _) => true,
        (Some(limit), OrderSide::Sell) => level_price >= limit,
        (Some(limit), OrderSide::Buy) => level_price <= limit,
    }
}

fn remove_consumed(snapshot: &mut BookSnapshot, side: OrderSide, consumed: &[(f64, f64)]) {
    if consumed.is_empty() {
        return;
    }
    let levels = snapshot.side_levels_mut(contra_side(side));
    for level in levels.iter_mut() {
        let taken: f64 = consumed
            .iter()
            .filter(|(price, _)| same_price(*price, level.price))
            .map(|(_, qty)| qty)
            .sum();
        level.quantity = (level.quantity - taken).max(0.0);
    }
    levels.retain(|l| l.quantity > 0.0);
}

fn take_liquidity(
    snapshot: &mut BookSnapshot,
    side: OrderSide,
    limit: Option<f64>,
    mut remaining: f64,
    consumed: &mut Vec<(f64, f64)>,
    fills: &mut Vec<CounterTrade>,
) -> f64 {
    let timestamp_ns = snapshot.timestamp_ns;
    let levels = snapshot.side_levels_mut(contra_side(side));

    for level in levels.iter_mut() {
        if remaining <= 0.0 || !crosses(side, level.price, limit) {
            break;
        }
        let qty = level.quantity.min(remaining);
        if qty <= 0.0 {
            continue;
        }
        level.quantity -= qty;
        remaining -= qty;
        consumed.push((level.price, qty));
        fills.push(CounterTrade {
            timestamp_ns,
            side,
            price: level.price,
            quantity: qty,
        });
    }
    levels.retain(|l| l.quantity > 0.0);
    remaining
}
