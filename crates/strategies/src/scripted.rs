use crate::Strategy;
use crate::error::StrategyError;
use core_types::{DataEvent, OrderSide, SignalEvent};
use events::PortfolioState;
use feed::Feed;

/// Replays a fixed list of directions, one per observation.
///
/// `None` entries (and every observation past the end of the script) produce
/// no signal. Deterministic by construction, which makes it the fixture of
/// choice for engine tests.
#[derive(Debug, Clone)]
pub struct ScriptedStrategy {
    script: Vec<Option<OrderSide>>,
    position: usize,
}

impl ScriptedStrategy {
    pub fn new(script: Vec<Option<OrderSide>>) -> Self {
        Self { script, position: 0 }
    }
}

impl Strategy for ScriptedStrategy {
    fn calculate_signal(
        &mut self,
        observation: &DataEvent,
        _feed: &dyn Feed,
        _portfolio: &PortfolioState,
    ) -> Result<Option<SignalEvent>, StrategyError> {
        let step = self.script.get(self.position).copied().flatten();
        self.position += 1;
        Ok(step.map(|side| SignalEvent::new(observation.timestamp(), observation.symbol(), Some(side))))
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}
