use crate::error::ExecutorError;
use chrono::{DateTime, Utc};
use configuration::{PortfolioSettings, ResetPolicy};
use core_types::{DataEvent, Event, FillEvent, FillSide, OrderEvent, OrderSide, Position, SignalEvent, round_money};
use events::PortfolioState;
use feed::Feed;
use risk::{FixedFractionSizer, PassThroughRiskManager, PositionSizer, RiskManager};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::fmt;

/// Manages the state of a trading account: cash, positions and the
/// transaction log.
///
/// Signals become orders here (subject to holdings and affordability checks and
/// the injected sizing and risk hooks), and fills are applied here. Nothing else
/// mutates a `Position`.
pub struct Portfolio {
    initial_cash: Decimal,
    cash: Decimal,
    positions: HashMap<String, Position>,
    transactions: Vec<FillEvent>,
    min_tradable_qty: Decimal,
    sizer: Box<dyn PositionSizer>,
    risk_manager: Box<dyn RiskManager>,
}

impl Portfolio {
    /// Creates a new `Portfolio` with the default policies: a 0.2 dust
    /// threshold, fixed-fraction sizing of 0.2 units and no risk overlay.
    pub fn new(initial_cash: Decimal) -> Self {
        Self::with_policies(
            initial_cash,
            dec!(0.2),
            Box::new(FixedFractionSizer::default()),
            Box::new(PassThroughRiskManager),
        )
    }

    pub fn with_policies(
        initial_cash: Decimal,
        min_tradable_qty: Decimal,
        sizer: Box<dyn PositionSizer>,
        risk_manager: Box<dyn RiskManager>,
    ) -> Self {
        Self {
            initial_cash,
            cash: initial_cash,
            positions: HashMap::new(),
            transactions: Vec::new(),
            min_tradable_qty,
            sizer,
            risk_manager,
        }
    }

    /// Builds a portfolio from the `[portfolio]` section of the configuration.
    pub fn from_settings(initial_cash: Decimal, settings: &PortfolioSettings) -> Result<Self, ExecutorError> {
        let sizer = FixedFractionSizer::new(settings.order_fraction, settings.order_unit)?;
        Ok(Self::with_policies(
            initial_cash,
            settings.min_tradable_qty,
            Box::new(sizer),
            Box::new(PassThroughRiskManager),
        ))
    }

    pub fn set_sizer(&mut self, sizer: Box<dyn PositionSizer>) {
        self.sizer = sizer;
    }

    pub fn set_risk_manager(&mut self, risk_manager: Box<dyn RiskManager>) {
        self.risk_manager = risk_manager;
    }

    /// Turns a signal into a sized order, or explains why no order is placed.
    pub fn on_signal(&self, signal: &SignalEvent, feed: &dyn Feed) -> Result<OrderEvent, ExecutorError> {
        let symbol = &signal.event.symbol;

        // --- 1. Validation ---
        let side = signal.direction.ok_or_else(|| ExecutorError::EmptyDirection { symbol: symbol.clone() })?;

        let held = self.positions.get(symbol).map(|p| p.quantity).unwrap_or(Decimal::ZERO);
        if side == OrderSide::Sell && held <= self.min_tradable_qty {
            return Err(ExecutorError::InsufficientHoldings {
                symbol: symbol.clone(),
                held,
                minimum: self.min_tradable_qty,
            });
        }

        let latest_price = feed
            .latest_price(symbol, signal.event.timestamp)
            .ok_or_else(|| ExecutorError::NoPriceData(symbol.clone()))?;

        let required = self.min_tradable_qty * latest_price;
        if side == OrderSide::Buy && self.cash <= required {
            return Err(ExecutorError::InsufficientCash {
                symbol: symbol.clone(),
                required,
                available: self.cash,
            });
        }

        // --- 2. Sizing and risk hooks ---
        let state = self.state(signal.event.timestamp);
        let order = OrderEvent::market(Event::new(signal.event.timestamp, symbol.clone()), side);
        let order = self.sizer.size_order(order, latest_price, &state)?;
        let order = self.risk_manager.evaluate_order(order, latest_price, &state)?;

        tracing::debug!(
            symbol = %order.event.symbol,
            side = %order.side,
            quantity = %order.quantity,
            "Portfolio: order created from signal"
        );
        Ok(order)
    }

    /// Applies a fill to positions and cash and records it in the transaction log.
    pub fn on_fill(&mut self, fill: FillEvent) -> &FillEvent {
        // --- Position Update ---
        match self.positions.get_mut(&fill.event.symbol) {
            Some(position) => position.apply_fill(&fill),
            None => {
                self.positions
                    .insert(fill.event.symbol.clone(), Position::from_fill(&fill));
            }
        }

        // --- Cash Update ---
        match fill.side {
            FillSide::Bought => self.cash -= fill.net_value(),
            FillSide::Sold => self.cash += fill.net_value(),
        }

        tracing::debug!(
            symbol = %fill.event.symbol,
            side = %fill.side,
            net_value = %fill.net_value(),
            cash = %self.cash,
            "Portfolio: fill applied"
        );

        self.transactions.push(fill);
        // The log was just pushed to, so it cannot be empty.
        &self.transactions[self.transactions.len() - 1]
    }

    /// Marks the position in the observation's symbol to market, if one is held.
    pub fn update(&mut self, observation: &DataEvent) {
        if let Some(position) = self.positions.get_mut(observation.symbol()) {
            if !position.is_flat() {
                position.mark_to_market(observation.latest_price(), observation.timestamp());
            }
        }
    }

    /// Total value: cash plus the market value of every position, rounded to
    /// the policy precision.
    pub fn value(&self) -> Decimal {
        let holdings: Decimal = self.positions.values().map(|p| p.market_value).sum();
        round_money(self.cash + holdings)
    }

    /// Returns the position for `symbol` and whether it is non-zero.
    pub fn is_invested(&self, symbol: &str) -> (Option<&Position>, bool) {
        let position = self.positions.get(symbol);
        let invested = position.is_some_and(|p| !p.is_flat());
        (position, invested)
    }

    /// Clears cash to zero and empties the transaction log. The configured
    /// initial cash is untouched; positions are cleared only under
    /// `ResetPolicy::ClearHoldings`.
    pub fn reset(&mut self, policy: ResetPolicy) {
        self.cash = Decimal::ZERO;
        self.transactions.clear();
        if policy == ResetPolicy::ClearHoldings {
            self.positions.clear();
        }
    }

    /// A read-only snapshot suitable for strategies and reporting.
    pub fn state(&self, timestamp: DateTime<Utc>) -> PortfolioState {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        PortfolioState {
            timestamp,
            initial_cash: self.initial_cash,
            cash: self.cash,
            total_value: self.value(),
            positions,
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn set_cash(&mut self, cash: Decimal) {
        self.cash = cash;
    }

    pub fn initial_cash(&self) -> Decimal {
        self.initial_cash
    }

    pub fn set_initial_cash(&mut self, initial_cash: Decimal) {
        self.initial_cash = initial_cash;
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    /// Every fill applied so far, oldest first.
    pub fn transactions(&self) -> &[FillEvent] {
        &self.transactions
    }
}

impl fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portfolio")
            .field("initial_cash", &self.initial_cash)
            .field("cash", &self.cash)
            .field("positions", &self.positions)
            .field("transactions", &self.transactions.len())
            .field("min_tradable_qty", &self.min_tradable_qty)
            .finish_non_exhaustive()
    }
}
