use crate::RiskManager;
use crate::error::RiskError;
use core_types::{OrderEvent, OrderSide};
use events::PortfolioState;
use rust_decimal::Decimal;

/// Accepts every order unchanged. The default risk hook.
#[derive(Debug, Clone, Default)]
pub struct PassThroughRiskManager;

impl RiskManager for PassThroughRiskManager {
    fn evaluate_order(
        &self,
        order: OrderEvent,
        _latest_price: Decimal,
        _portfolio: &PortfolioState,
    ) -> Result<OrderEvent, RiskError> {
        Ok(order)
    }
}

/// Caps position size per symbol and never lets a sell take holdings below zero.
#[derive(Debug, Clone)]
pub struct SimpleRiskManager {
    max_position_qty: Decimal,
}

impl SimpleRiskManager {
    /// Creates a new `SimpleRiskManager` with the given per-symbol limit.
    pub fn new(max_position_qty: Decimal) -> Result<Self, RiskError> {
        if max_position_qty <= Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "max_position_qty must be greater than 0".to_string(),
            ));
        }
        Ok(Self { max_position_qty })
    }
}

impl RiskManager for SimpleRiskManager {
    fn evaluate_order(
        &self,
        mut order: OrderEvent,
        _latest_price: Decimal,
        portfolio: &PortfolioState,
    ) -> Result<OrderEvent, RiskError> {
        if order.quantity <= Decimal::ZERO {
            return Err(RiskError::InvalidQuantity(order.quantity));
        }

        let held = portfolio.quantity(&order.event.symbol);
        let allowed = match order.side {
            OrderSide::Buy => self.max_position_qty - held,
            OrderSide::Sell => held,
        };

        if allowed <= Decimal::ZERO {
            return Err(RiskError::Rejected {
                symbol: order.event.symbol.clone(),
                reason: format!("{} of {} would breach the position limit", order.side, order.quantity),
            });
        }

        if order.quantity > allowed {
            tracing::debug!(
                symbol = %order.event.symbol,
                requested = %order.quantity,
                allowed = %allowed,
                "SimpleRiskManager: capping order quantity"
            );
            order.quantity = allowed;
        }
        Ok(order)
    }
}
