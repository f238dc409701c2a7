use crate::Strategy;
use crate::error::StrategyError;
use configuration::StrategySettings;
use core_types::{DataEvent, OrderSide, SignalEvent};
use events::PortfolioState;
use feed::Feed;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The placeholder reference strategy: picks a random direction per observation.
///
/// With the default probabilities roughly 20% of observations produce a buy,
/// 20% a sell and the rest nothing. It exists to exercise the pipeline, not to
/// trade. The random source is seeded so a run can be replayed exactly.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    seed: u64,
    buy_probability: f64,
    sell_probability: f64,
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a new `RandomStrategy` instance with the given parameters.
    ///
    /// It performs validation to ensure the probabilities are logical.
    pub fn new(seed: u64, buy_probability: f64, sell_probability: f64) -> Result<Self, StrategyError> {
        let in_range = |p: f64| (0.0..=1.0).contains(&p);
        if !in_range(buy_probability) || !in_range(sell_probability) {
            return Err(StrategyError::InvalidParameters(
                "Probabilities must be between 0 and 1".to_string(),
            ));
        }
        if buy_probability + sell_probability > 1.0 {
            return Err(StrategyError::InvalidParameters(
                "Buy and sell probabilities must not sum to more than 1".to_string(),
            ));
        }

        Ok(Self {
            seed,
            buy_probability,
            sell_probability,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn from_settings(settings: &StrategySettings) -> Result<Self, StrategyError> {
        Self::new(settings.seed, settings.buy_probability, settings.sell_probability)
    }

    fn draw_direction(&mut self) -> Option<OrderSide> {
        let draw: f64 = self.rng.gen_range(0.0..1.0);
        if draw < self.buy_probability {
            Some(OrderSide::Buy)
        } else if draw < self.buy_probability + self.sell_probability {
            Some(OrderSide::Sell)
        } else {
            None
        }
    }
}

impl Strategy for RandomStrategy {
    fn calculate_signal(
        &mut self,
        observation: &DataEvent,
        _feed: &dyn Feed,
        _portfolio: &PortfolioState,
    ) -> Result<Option<SignalEvent>, StrategyError> {
        let signal = self
            .draw_direction()
            .map(|side| SignalEvent::new(observation.timestamp(), observation.symbol(), Some(side)));

        if let Some(signal) = &signal {
            tracing::debug!(symbol = %observation.symbol(), direction = ?signal.direction, "RandomStrategy: signal");
        }
        Ok(signal)
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
