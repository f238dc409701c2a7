use crate::error::ExecutorError;
use configuration::Simulation;
use core_types::{FillEvent, FillSide, OrderEvent, truncate_money};
use feed::Feed;
use rust_decimal::Decimal;

/// A generic trait for an execution engine.
///
/// This trait allows the backtester to be agnostic about how fills are priced.
pub trait Executor: Send + Sync {
    /// Processes an `OrderEvent` and returns a `FillEvent` receipt.
    ///
    /// This function calculates the costs of the trade but crucially **does not
    /// modify the portfolio state itself**. The caller is responsible for using
    /// the returned fill to update the portfolio.
    fn execute_order(&self, order: &OrderEvent, feed: &dyn Feed) -> Result<FillEvent, ExecutorError>;
}

/// The "virtual exchange" for backtesting.
///
/// A pure price-taker: every order fills in full at the latest observed price,
/// with no slippage and no regard for a limit price.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    params: Simulation,
}

impl SimulatedExecutor {
    pub fn new(params: Simulation) -> Self {
        Self { params }
    }

    /// Commission on a trade, truncated (never rounded up) to the policy precision.
    pub fn calculate_commission(&self, quantity: Decimal, price: Decimal) -> Decimal {
        truncate_money(quantity * price * self.params.commission_rate)
    }

    /// The venue's flat per-fill fee.
    pub fn calculate_exchange_fee(&self) -> Decimal {
        self.params.exchange_fee
    }

    pub fn calculate_cost(&self, commission: Decimal, fee: Decimal) -> Decimal {
        commission + fee
    }
}

impl Executor for SimulatedExecutor {
    fn execute_order(&self, order: &OrderEvent, feed: &dyn Feed) -> Result<FillEvent, ExecutorError> {
        // 1. Fetch the latest known price for the symbol.
        let price = feed
            .latest_price(&order.event.symbol, order.event.timestamp)
            .ok_or_else(|| ExecutorError::NoPriceData(order.event.symbol.clone()))?;

        // 2. Calculate the trading costs.
        let commission = self.calculate_commission(order.quantity, price);
        let exchange_fee = self.calculate_exchange_fee();
        let cost = self.calculate_cost(commission, exchange_fee);

        // 3. Construct the fill receipt.
        let fill = FillEvent {
            event: order.event.clone(),
            exchange: self.params.venue.clone(),
            side: FillSide::from(order.side),
            quantity: order.quantity,
            price,
            commission,
            exchange_fee,
            cost,
        };

        tracing::debug!(
            symbol = %fill.event.symbol,
            side = %fill.side,
            quantity = %fill.quantity,
            price = %fill.price,
            cost = %fill.cost,
            "SimulatedExecutor: filled order"
        );
        Ok(fill)
    }
}
