use crate::order::OrderSide;

/// Simulated fill reported by the matching engine.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CounterTrade {
    /// Snapshot timestamp at which the fill happened (nanoseconds)
    pub timestamp_ns: i64,
    /// Side of the order that was filled
    pub side: OrderSide,
    /// Execution price
    pub price: f64,
    /// Executed quantity
    pub quantity: f64,
}

impl CounterTrade {
    /// Notional value of this fill.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Total executed quantity across `trades`.
#[must_use]
pub fn total_quantity(trades: &[CounterTrade]) -> f64 {
    trades.iter().map(|t| t.quantity).sum()
}

/// Volume-weighted average price, `None` if nothing was executed.
#[must_use]
pub fn vwap(trades: &[CounterTrade]) -> Option<f64> {
    let qty = total_quantity(trades);
    if qty <= 0.0 {
        return None;
    }
    Some(trades.iter().map(CounterTrade::value).sum::<f64>() / qty)
}
