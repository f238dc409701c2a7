//! # Hindsight Risk
//!
//! The two policy hooks the portfolio runs every order through: a
//! `PositionSizer` that decides how much to trade, and a `RiskManager` that
//! may adjust or veto the sized order. Both are trait objects injected into the
//! portfolio, so richer policies can be substituted without touching it.

pub mod error;
pub mod simple_manager;
pub mod sizing;

pub use error::RiskError;
pub use simple_manager::{PassThroughRiskManager, SimpleRiskManager};
pub use sizing::FixedFractionSizer;

use core_types::OrderEvent;
use events::PortfolioState;
use rust_decimal::Decimal;

/// Decides the quantity of an order.
pub trait PositionSizer: Send + Sync {
    /// Returns `order` with its quantity filled in.
    fn size_order(
        &self,
        order: OrderEvent,
        latest_price: Decimal,
        portfolio: &PortfolioState,
    ) -> Result<OrderEvent, RiskError>;
}

/// Checks a sized order against portfolio-level rules.
pub trait RiskManager: Send + Sync {
    /// Returns the order to place, possibly adjusted, or an error to veto it.
    fn evaluate_order(
        &self,
        order: OrderEvent,
        latest_price: Decimal,
        portfolio: &PortfolioState,
    ) -> Result<OrderEvent, RiskError>;
}
