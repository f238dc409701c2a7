use crate::Strategy;
use crate::error::StrategyError;
use crate::random::RandomStrategy;
use configuration::StrategySettings;
use std::str::FromStr;

/// Identifies which strategy to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyId {
    #[default]
    Random,
}

impl FromStr for StrategyId {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyId::Random),
            other => Err(StrategyError::StrategyNotFound(other.to_string())),
        }
    }
}

/// Creates a new strategy instance based on the provided ID and settings.
pub fn create_strategy(id: StrategyId, settings: &StrategySettings) -> Result<Box<dyn Strategy>, StrategyError> {
    match id {
        StrategyId::Random => Ok(Box::new(RandomStrategy::from_settings(settings)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_names_are_reported() {
        assert_eq!(StrategyId::from_str("Random").unwrap(), StrategyId::Random);
        assert!(matches!(
            StrategyId::from_str("ma_crossover"),
            Err(StrategyError::StrategyNotFound(name)) if name == "ma_crossover"
        ));
    }

    #[test]
    fn factory_builds_from_default_settings() {
        assert!(create_strategy(StrategyId::Random, &StrategySettings::default()).is_ok());
    }
}
