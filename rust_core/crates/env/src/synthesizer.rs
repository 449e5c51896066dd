//! Order synthesis: turns an action and the current state into an order.

use tranche_data::DataError;
use tranche_types::{BookSnapshot, DiscretizedState, OrderRequest, OrderSide};

use crate::error::EnvError;
use crate::grid::Grid;

/// Seconds the order may rest in the time bucket `t`.
///
/// For the first grid element this is `t` itself, otherwise the width of
/// the interval between `t` and its predecessor.
///
/// # Errors
/// Returns [`EnvError::OffGrid`] if `t` is not on `time`.
pub fn determine_runtime(t: f64, time: &Grid) -> Result<f64, EnvError> {
    let pos = time.position(t).ok_or(EnvError::OffGrid { value: t })?;
    match pos {
        0 => Ok(t),
        _ => Ok(time.values()[pos] - time.values()[pos - 1]),
    }
}

/// Builds the order for one step.
///
/// A non-positive `runtime` or a missing level gives a MARKET order; otherwise
/// a LIMIT order priced at `level` in `snapshot`. Levels address whole book
/// depths, fractional levels are rounded. The quantity is always the
/// inventory of `state`.
///
/// # Errors
/// Returns [`DataError::EmptySide`] if the book side addressed by `level` is
/// empty in the snapshot at `index`.
pub fn synthesize(
    state: &DiscretizedState,
    level: Option<f64>,
    runtime: f64,
    snapshot: &BookSnapshot,
    side: OrderSide,
    index: usize,
) -> Result<OrderRequest, EnvError> {
    let Some(level) = level.filter(|_| runtime > 0.0) else {
        return Ok(OrderRequest::market(side, state.i()));
    };

    #[allow(clippy::cast_possible_truncation)]
    let offset = level.round() as i64;
    let price = snapshot.price_at_level(side, offset).ok_or(DataError::EmptySide {
        index,
        side: if offset >= 0 { side } else { side.opposite() },
    })?;
    Ok(OrderRequest::limit(side, state.i(), price))
}
