use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Risk parameters from configuration are invalid: {0}")]
    InvalidParameters(String),

    #[error("Sized order quantity ({0}) is zero or negative.")]
    InvalidQuantity(Decimal),

    #[error("Order for {symbol} rejected by risk rules: {reason}")]
    Rejected { symbol: String, reason: String },
}
