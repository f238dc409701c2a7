use crate::PositionSizer;
use crate::error::RiskError;
use core_types::OrderEvent;
use events::PortfolioState;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sizes every order as a fixed fraction of a notional unit quantity,
/// independent of price and portfolio value.
#[derive(Debug, Clone)]
pub struct FixedFractionSizer {
    fraction: Decimal,
    unit: Decimal,
}

impl FixedFractionSizer {
    /// Creates a new sizer. Both parameters must be strictly positive.
    pub fn new(fraction: Decimal, unit: Decimal) -> Result<Self, RiskError> {
        if fraction <= dec!(0) || unit <= dec!(0) {
            return Err(RiskError::InvalidParameters(
                "fraction and unit must be greater than 0".to_string(),
            ));
        }
        Ok(Self { fraction, unit })
    }

    pub fn quantity(&self) -> Decimal {
        self.fraction * self.unit
    }
}

impl Default for FixedFractionSizer {
    fn default() -> Self {
        Self {
            fraction: dec!(0.2),
            unit: Decimal::ONE,
        }
    }
}

impl PositionSizer for FixedFractionSizer {
    fn size_order(
        &self,
        mut order: OrderEvent,
        _latest_price: Decimal,
        _portfolio: &PortfolioState,
    ) -> Result<OrderEvent, RiskError> {
        order.quantity = self.quantity();
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::{Event, OrderSide};

    #[test]
    fn sizes_to_fraction_of_unit() {
        let ts = Utc.with_ymd_and_hms(2017, 12, 10, 15, 0, 0).unwrap();
        let state = PortfolioState {
            timestamp: ts,
            initial_cash: dec!(1000),
            cash: dec!(1000),
            total_value: dec!(1000),
            positions: Vec::new(),
        };
        let order = OrderEvent::market(Event::new(ts, "USDT-ETH"), OrderSide::Buy);

        let sized = FixedFractionSizer::default().size_order(order.clone(), dec!(450), &state).unwrap();
        assert_eq!(sized.quantity, dec!(0.2));

        let sized = FixedFractionSizer::new(dec!(0.5), dec!(4)).unwrap().size_order(order, dec!(450), &state).unwrap();
        assert_eq!(sized.quantity, dec!(2));
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(FixedFractionSizer::new(Decimal::ZERO, Decimal::ONE).is_err());
        assert!(FixedFractionSizer::new(dec!(0.2), dec!(-1)).is_err());
    }
}
