//! Volume-weighted execution reward.

use tranche_types::{CounterTrade, OrderSide, total_quantity, vwap};

/// Reward of one step together with its volume ratio.
///
/// `volume_ratio = executed / max_inventory`. Price improvement against
/// `reference` is `vwap - reference` when selling and `reference - vwap`
/// when buying; the reward is that improvement times the volume ratio.
/// No trades or a non-positive `max_inventory` yield `(0.0, 0.0)`.
#[must_use]
pub fn reward_weighted(
    trades: &[CounterTrade],
    reference: f64,
    side: OrderSide,
    max_inventory: f64,
) -> (f64, f64) {
    if max_inventory <= 0.0 {
        return (0.0, 0.0);
    }
    let Some(avg) = vwap(trades) else {
        return (0.0, 0.0);
    };

    let volume_ratio = total_quantity(trades) / max_inventory;
    let improvement = match side {
        OrderSide::Sell => avg - reference,
        OrderSide::Buy => reference - avg,
    };
    (improvement * volume_ratio, volume_ratio)
}
