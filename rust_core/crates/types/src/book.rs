use crate::order::OrderSide;

/// One price level of an order-book side
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookLevel {
    /// Price of the level
    pub price: f64,
    /// Resting quantity at the level
    pub quantity: f64,
}

impl BookLevel {
    /// Creates a new level.
    #[must_use]
    pub fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }
}

/// Order-book snapshot at one point in time.
///
/// Bids are stored best-first (descending price), asks best-first
/// (ascending price).
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct BookSnapshot {
    /// Unix epoch nanoseconds UTC
    pub timestamp_ns: i64,
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
}

impl BookSnapshot {
    /// Creates a snapshot from already ordered sides.
    #[must_use]
    pub fn new(timestamp_ns: i64, bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self {
            timestamp_ns,
            bids,
            asks,
        }
    }

    /// Best (highest) bid price.
    #[must_use]
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    /// Best (lowest) ask price.
    #[must_use]
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    /// Mid price between best bid and best ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Spread between best ask and best bid.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Levels resting on the given side (`Buy` = bids, `Sell` = asks).
    #[must_use]
    pub fn side_levels(&self, side: OrderSide) -> &[BookLevel] {
        match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        }
    }

    /// Mutable access to the levels of one side.
    pub fn side_levels_mut(&mut self, side: OrderSide) -> &mut Vec<BookLevel> {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }

    /// Price an order of `side` would be placed at for the level offset `level`.
    ///
    /// | Order side | `level >= 0`               | `level < 0`                      |
    /// |------------|----------------------------|----------------------------------|
    /// | Sell       | ask side, depth `level`    | bid side, depth `-level - 1`     |
    /// | Buy        | bid side, depth `level`    | ask side, depth `-level - 1`     |
    ///
    /// Non-negative levels rest passively on the order's own side, negative
    /// levels cross the spread. When the requested depth exceeds the levels
    /// present, the price continues linearly with the spacing of the last two
    /// levels (the spread if the side has a single level).
    ///
    /// Returns `None` if the addressed side is empty, or if extrapolation is
    /// needed from a single level while the spread is undefined.
    #[must_use]
    pub fn price_at_level(&self, side: OrderSide, level: i64) -> Option<f64> {
        let (resting, depth) = if level >= 0 {
            (side, level.unsigned_abs())
        } else {
            (side.opposite(), level.unsigned_abs() - 1)
        };
        let levels = self.side_levels(resting);
        let depth = usize::try_from(depth).ok()?;

        if let Some(l) = levels.get(depth) {
            return Some(l.price);
        }

        let last = levels.last()?;
        let tick = if levels.len() == 1 {
            self.spread()?.abs()
        } else {
            let n = levels.len();
            (levels[n - 1].price - levels[n - 2].price).abs()
        };
        let beyond = (depth - (levels.len() - 1)) as f64;
        // Bids deepen downwards, asks upwards.
        let price = match resting {
            OrderSide::Buy => last.price - tick * beyond,
            OrderSide::Sell => last.price + tick * beyond,
        };
        Some(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot() -> BookSnapshot {
        BookSnapshot::new(
            0,
            vec![
                BookLevel::new(99.0, 1.0),
                BookLevel::new(98.0, 2.0),
                BookLevel::new(97.0, 3.0),
            ],
            vec![
                BookLevel::new(101.0, 1.0),
                BookLevel::new(102.0, 2.0),
                BookLevel::new(103.0, 3.0),
            ],
        )
    }

    #[test]
    fn test_best_prices() {
        let s = snapshot();
        assert_eq!(s.best_bid(), Some(99.0));
        assert_eq!(s.best_ask(), Some(101.0));
        assert_eq!(s.mid_price(), Some(100.0));
        assert_eq!(s.spread(), Some(2.0));
    }

    #[test]
    fn test_price_at_level_sell() {
        let s = snapshot();
        assert_eq!(s.price_at_level(OrderSide::Sell, 0), Some(101.0));
        assert_eq!(s.price_at_level(OrderSide::Sell, 2), Some(103.0));
        assert_eq!(s.price_at_level(OrderSide::Sell, -1), Some(99.0));
        assert_eq!(s.price_at_level(OrderSide::Sell, -3), Some(97.0));
    }

    #[test]
    fn test_price_at_level_buy() {
        let s = snapshot();
        assert_eq!(s.price_at_level(OrderSide::Buy, 0), Some(99.0));
        assert_eq!(s.price_at_level(OrderSide::Buy, 1), Some(98.0));
        assert_eq!(s.price_at_level(OrderSide::Buy, -1), Some(101.0));
        assert_eq!(s.price_at_level(OrderSide::Buy, -2), Some(102.0));
    }

    #[test]
    fn test_price_at_level_extrapolates_beyond_depth() {
        let s = snapshot();
        assert_relative_eq!(s.price_at_level(OrderSide::Sell, 5).unwrap(), 106.0);
        assert_relative_eq!(s.price_at_level(OrderSide::Buy, 4).unwrap(), 95.0);
        assert_relative_eq!(s.price_at_level(OrderSide::Sell, -5).unwrap(), 95.0);
    }

    #[test]
    fn test_price_at_level_single_level_uses_spread() {
        let s = BookSnapshot::new(
            0,
            vec![BookLevel::new(99.0, 1.0)],
            vec![BookLevel::new(100.0, 1.0)],
        );
        assert_relative_eq!(s.price_at_level(OrderSide::Sell, 2).unwrap(), 102.0);
    }

    #[test]
    fn test_price_at_level_empty_side() {
        let s = BookSnapshot::new(0, vec![BookLevel::new(99.0, 1.0)], vec![]);
        assert!(s.price_at_level(OrderSide::Sell, 0).is_none());
        assert_eq!(s.price_at_level(OrderSide::Sell, -1), Some(99.0));
    }
}
