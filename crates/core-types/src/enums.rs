use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a signal or an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side of the order
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("buy"),
            OrderSide::Sell => f.write_str("sell"),
        }
    }
}

/// The side of a completed fill.
///
/// Kept separate from `OrderSide` so that a fill can never be confused with an
/// intention: a signal says "buy", the exchange answers "bought".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillSide {
    #[serde(rename = "BOT")]
    Bought,
    #[serde(rename = "SLD")]
    Sold,
}

impl FillSide {
    /// +1 for a bought fill, -1 for a sold fill.
    pub fn sign(&self) -> i8 {
        match self {
            FillSide::Bought => 1,
            FillSide::Sold => -1,
        }
    }
}

impl From<OrderSide> for FillSide {
    fn from(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => FillSide::Bought,
            OrderSide::Sell => FillSide::Sold,
        }
    }
}

impl fmt::Display for FillSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillSide::Bought => f.write_str("BOT"),
            FillSide::Sold => f.write_str("SLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Market,
    Limit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_side_uses_its_own_vocabulary() {
        assert_eq!(FillSide::from(OrderSide::Buy), FillSide::Bought);
        assert_eq!(FillSide::from(OrderSide::Sell), FillSide::Sold);
        assert_eq!(serde_json::to_string(&FillSide::Bought).unwrap(), "\"BOT\"");
        assert_eq!(serde_json::to_string(&FillSide::Sold).unwrap(), "\"SLD\"");
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "\"buy\"");
    }

    #[test]
    fn order_type_defaults_to_market() {
        assert_eq!(OrderType::default(), OrderType::Market);
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }
}
