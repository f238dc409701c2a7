use crate::enums::{FillSide, OrderSide, OrderType};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fields every event in the pipeline carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
        }
    }
}

/// A single timestamped market observation for one symbol.
///
/// Only the closing price is mandatory; bar data sources may also fill in the
/// open/high/low/volume fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEvent {
    #[serde(flatten)]
    pub event: Event,
    pub close: Decimal,
    #[serde(default)]
    pub open: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
}

impl DataEvent {
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>, close: Decimal) -> Self {
        Self {
            event: Event::new(timestamp, symbol),
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.event.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.event.symbol
    }

    /// The price a price-taker would trade at for this observation.
    pub fn latest_price(&self) -> Decimal {
        self.close
    }

    /// Rejects observations that cannot be traded against.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.event.symbol.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                format!("empty symbol at {}", self.event.timestamp),
            ));
        }
        if self.close <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "close".to_string(),
                format!("{} {} has non-positive price {}", self.event.symbol, self.event.timestamp, self.close),
            ));
        }
        Ok(())
    }
}

/// A directional trading intention. `direction == None` means "no opinion".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    #[serde(flatten)]
    pub event: Event,
    pub direction: Option<OrderSide>,
}

impl SignalEvent {
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>, direction: Option<OrderSide>) -> Self {
        Self {
            event: Event::new(timestamp, symbol),
            direction,
        }
    }
}

/// A sized, typed instruction derived from a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    #[serde(flatten)]
    pub event: Event,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub order_type: OrderType,
    /// Carried for completeness; the simulated exchange fills every order at the
    /// observed price regardless of this value.
    pub limit_price: Option<Decimal>,
}

impl OrderEvent {
    /// Creates an unsized market order.
    pub fn market(event: Event, side: OrderSide) -> Self {
        Self {
            event,
            side,
            quantity: Decimal::ZERO,
            order_type: OrderType::Market,
            limit_price: None,
        }
    }
}

/// The simulated execution result of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    #[serde(flatten)]
    pub event: Event,
    /// Name of the venue that produced the fill.
    pub exchange: String,
    pub side: FillSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub commission: Decimal,
    pub exchange_fee: Decimal,
    /// commission + exchange fee
    pub cost: Decimal,
}

impl FillEvent {
    /// Gross traded value, price × quantity.
    pub fn value(&self) -> Decimal {
        self.price * self.quantity
    }

    /// The cash that changes hands: the buyer pays value plus costs, the
    /// seller receives value minus costs.
    ///
    /// A sold fill nets costs out of the proceeds rather than adding them on
    /// top, so commission always reduces cash whichever side pays it.
    pub fn net_value(&self) -> Decimal {
        match self.side {
            FillSide::Bought => self.value() + self.cost,
            FillSide::Sold => self.value() - self.cost,
        }
    }
}

/// Net holdings and valuation for one symbol.
///
/// Quantity is signed: positive is long, negative is short. The record is
/// created on the first fill and mutated in place afterwards; it stays around
/// when the quantity returns to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub market_price: Decimal,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl Position {
    /// Opens a position from its first fill.
    pub fn from_fill(fill: &FillEvent) -> Self {
        let mut position = Self {
            symbol: fill.event.symbol.clone(),
            quantity: Decimal::ZERO,
            average_price: Decimal::ZERO,
            market_price: fill.price,
            market_value: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            last_updated: fill.event.timestamp,
        };
        position.apply_fill(fill);
        position
    }

    /// Applies a fill to the position, updating quantity, average price and P&L.
    pub fn apply_fill(&mut self, fill: &FillEvent) {
        let signed_quantity = fill.quantity * Decimal::from(fill.side.sign());
        let held = self.quantity;
        let increasing = held.is_zero() || held.is_sign_positive() == signed_quantity.is_sign_positive();

        if increasing {
            let total = held.abs() + fill.quantity;
            if !total.is_zero() {
                self.average_price = (self.average_price * held.abs() + fill.price * fill.quantity) / total;
            }
        } else {
            let closed = fill.quantity.min(held.abs());
            let per_unit = if held.is_sign_positive() {
                fill.price - self.average_price
            } else {
                self.average_price - fill.price
            };
            self.realized_pnl += closed * per_unit;

            if fill.quantity > held.abs() {
                // Flipped through flat: the remainder opens at the fill price.
                self.average_price = fill.price;
            } else if fill.quantity == held.abs() {
                self.average_price = Decimal::ZERO;
            }
        }

        self.quantity = held + signed_quantity;
        self.realized_pnl -= fill.cost;
        self.cost_basis = self.quantity * self.average_price;
        self.mark_to_market(fill.price, fill.event.timestamp);
    }

    /// Revalues the position at a new market price.
    pub fn mark_to_market(&mut self, price: Decimal, timestamp: DateTime<Utc>) {
        self.market_price = price;
        self.market_value = self.quantity * price;
        self.unrealized_pnl = self.quantity * (price - self.average_price);
        self.last_updated = timestamp;
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }
}
