use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Signal for {symbol} carries no direction")]
    EmptyDirection { symbol: String },

    #[error("Not enough {symbol} held to sell. Held: {held}, Minimum: {minimum}")]
    InsufficientHoldings { symbol: String, held: Decimal, minimum: Decimal },

    #[error("Not enough cash available to buy {symbol}. Required: more than {required}, Available: {available}")]
    InsufficientCash { symbol: String, required: Decimal, available: Decimal },

    #[error("No price data available for symbol: {0}")]
    NoPriceData(String),

    #[error("Risk management error: {0}")]
    Risk(#[from] risk::RiskError),
}

impl ExecutorError {
    /// True for errors that only mean "no order this tick" rather than a
    /// problem with the data the run depends on.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, ExecutorError::NoPriceData(_))
    }
}
