use std::fmt;

/// Side of the parent order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    /// Buy side (consumes asks)
    Buy,
    /// Sell side (consumes bids)
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Type of order handed to the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

/// Concrete order synthesized for one step.
///
/// `price` is `Some` exactly when `order_type` is [`OrderType::Limit`]; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRequest {
    order_type: OrderType,
    side: OrderSide,
    quantity: f64,
    price: Option<f64>,
}

impl OrderRequest {
    /// Creates a market order without price.
    #[must_use]
    pub fn market(side: OrderSide, quantity: f64) -> Self {
        Self {
            order_type: OrderType::Market,
            side,
            quantity,
            price: None,
        }
    }

    /// Creates a limit order at `price`.
    #[must_use]
    pub fn limit(side: OrderSide, quantity: f64, price: f64) -> Self {
        Self {
            order_type: OrderType::Limit,
            side,
            quantity,
            price: Some(price),
        }
    }

    /// Order type
    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Order side
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Requested quantity
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Limit price (`None` for market orders)
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Returns `true` for market orders.
    #[must_use]
    pub fn is_market(&self) -> bool {
        self.order_type == OrderType::Market
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(
                f,
                "{} {} {} @ {}",
                self.order_type, self.side, self.quantity, price
            ),
            None => write!(f, "{} {} {}", self.order_type, self.side, self.quantity),
        }
    }
}
