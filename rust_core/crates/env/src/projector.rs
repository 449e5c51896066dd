//! State projection: maps a matching outcome onto the next discretized state.

use tranche_data::{FeatureOptions, OrderbookSource};
use tranche_execution::Execution;
use tranche_types::{DiscretizedState, FeatureTensor};

use crate::error::EnvError;
use crate::grid::Grid;
use crate::spec::EnvSpec;

/// Next inventory bucket for `qty_remaining`.
///
/// At or below `tolerance` the order counts as fully executed and the result
/// is exactly `0.0`; otherwise the closest element of `{0.0} ∪ inventory`.
#[must_use]
pub fn determine_next_inventory(qty_remaining: f64, inventory: &Grid, tolerance: f64) -> f64 {
    if qty_remaining > tolerance {
        let next = inventory.nearest_with_zero(qty_remaining);
        tracing::debug!(qty_remaining, next_i = next, "inventory snapped");
        next
    } else {
        0.0
    }
}

/// Next time bucket: the grid predecessor of `t`, or `t` at the first
/// element.
///
/// # Errors
/// Returns [`EnvError::OffGrid`] if `t` is not on `time`.
pub fn determine_next_time(t: f64, time: &Grid) -> Result<f64, EnvError> {
    let pos = time.position(t).ok_or(EnvError::OffGrid { value: t })?;
    match pos {
        0 => Ok(t),
        _ => Ok(time.values()[pos - 1]),
    }
}

/// Feature tensor at `index`, normalized by the largest inventory value.
///
/// # Errors
/// Propagates order-book errors.
pub fn make_features<S: OrderbookSource>(
    orderbook: &S,
    index: usize,
    spec: &EnvSpec,
) -> Result<FeatureTensor, EnvError> {
    Ok(orderbook.bid_ask_features(
        index,
        spec.lookback(),
        spec.max_inventory(),
        FeatureOptions::default(),
        spec.book_size(),
    )?)
}

/// Projects `execution` onto a fresh state. The execution is left untouched.
///
/// # Errors
/// Returns [`EnvError::OffGrid`] for an off-grid time, or order-book errors.
pub fn project<S: OrderbookSource>(
    execution: &Execution,
    spec: &EnvSpec,
    orderbook: &S,
) -> Result<DiscretizedState, EnvError> {
    let i_next = determine_next_inventory(
        execution.qty_not_executed(),
        spec.inventory(),
        spec.qty_tolerance(),
    );
    let t_next = determine_next_time(execution.state().t(), spec.time())?;
    let features = make_features(orderbook, execution.orderbook_index(), spec)?;
    Ok(DiscretizedState::new(t_next, i_next, features))
}
