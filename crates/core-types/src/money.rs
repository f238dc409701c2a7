//! The single rounding policy for monetary and ratio values.
//!
//! Arithmetic is carried out at full `Decimal` precision; these helpers are only
//! applied where a value leaves a component (portfolio valuation, equity
//! returns, drawdowns, commissions).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every surfaced amount is rounded to.
pub const DECIMAL_PLACES: u32 = 4;

/// Rounds half away from zero to `DECIMAL_PLACES`.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates towards negative infinity at `DECIMAL_PLACES` (a floor, not a round).
pub fn truncate_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::ToNegativeInfinity)
}
