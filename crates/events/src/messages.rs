use crate::error::EventsError;
use chrono::{DateTime, Utc};
use core_types::{DataEvent, FillEvent, OrderEvent, Position, SignalEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete, read-only snapshot of the portfolio at one instant.
///
/// Strategies receive this instead of the live `Portfolio` so they can never
/// mutate bookkeeping, and renderers can serialize it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub timestamp: DateTime<Utc>,
    pub initial_cash: Decimal,
    pub cash: Decimal,
    pub total_value: Decimal,
    pub positions: Vec<Position>,
}

impl PortfolioState {
    /// Looks up the position held in `symbol`, if any.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Signed quantity held in `symbol`, zero when there is no position.
    pub fn quantity(&self, symbol: &str) -> Decimal {
        self.position(symbol).map(|p| p.quantity).unwrap_or(Decimal::ZERO)
    }
}

/// Every event the simulation loop produced, in the order it produced them.
///
/// Serializes as `{"type": "Fill", "payload": {...}}` so downstream consumers
/// can dispatch on the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EngineEvent {
    /// An observation consumed from the feed.
    Data(DataEvent),
    /// A signal emitted by the strategy.
    Signal(SignalEvent),
    /// An order accepted by the portfolio.
    Order(OrderEvent),
    /// A fill produced by the exchange.
    Fill(FillEvent),
}

impl EngineEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            EngineEvent::Data(e) => e.event.timestamp,
            EngineEvent::Signal(e) => e.event.timestamp,
            EngineEvent::Order(e) => e.event.timestamp,
            EngineEvent::Fill(e) => e.event.timestamp,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            EngineEvent::Data(e) => &e.event.symbol,
            EngineEvent::Signal(e) => &e.event.symbol,
            EngineEvent::Order(e) => &e.event.symbol,
            EngineEvent::Fill(e) => &e.event.symbol,
        }
    }

    pub fn to_json(&self) -> Result<String, EventsError> {
        Ok(serde_json::to_string(self)?)
    }
}
