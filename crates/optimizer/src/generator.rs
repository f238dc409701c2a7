use crate::error::OptimizerError;
use configuration::{Config, ParameterRange, SweepConfig};
use itertools::iproduct;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// One point of the parameter space. `index` is its position in the generated
/// order and is what sweep results are sorted by.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub index: usize,
    pub commission_rate: Decimal,
    pub order_fraction: Decimal,
    pub seed: u64,
}

impl ParameterSet {
    /// Applies this parameter set on top of a base configuration.
    pub fn apply(&self, base: &Config) -> Config {
        let mut config = base.clone();
        config.simulation.commission_rate = self.commission_rate;
        config.portfolio.order_fraction = self.order_fraction;
        config.strategy.seed = self.seed;
        config
    }
}

/// Generates every unique combination of parameters from the sweep definition.
///
/// A dimension missing from the sweep contributes the single value of the base
/// configuration.
pub fn generate_parameter_sets(sweep: &SweepConfig, base: &Config) -> Result<Vec<ParameterSet>, OptimizerError> {
    // 1. Convert all parameter ranges into concrete lists of values.
    let commission_rates = match &sweep.commission_rate {
        Some(range) => decimal_values("commission_rate", range)?,
        None => vec![base.simulation.commission_rate],
    };
    let order_fractions = match &sweep.order_fraction {
        Some(range) => decimal_values("order_fraction", range)?,
        None => vec![base.portfolio.order_fraction],
    };
    let seeds = match &sweep.seed {
        Some(range) => seed_values(range)?,
        None => vec![base.strategy.seed],
    };

    // 2. Take the Cartesian product in a fixed order.
    let sets = iproduct!(commission_rates, order_fractions, seeds)
        .enumerate()
        .map(|(index, (commission_rate, order_fraction, seed))| ParameterSet {
            index,
            commission_rate,
            order_fraction,
            seed,
        })
        .collect();
    Ok(sets)
}

fn decimal_values(name: &str, range: &ParameterRange) -> Result<Vec<Decimal>, OptimizerError> {
    let values = match range {
        ParameterRange::DiscreteInt(vals) => vals.iter().map(|&v| Decimal::from(v)).collect(),
        ParameterRange::DiscreteDecimal(vals) => vals.clone(),
        ParameterRange::LinearInt { start, end, step } => {
            if *step <= 0 {
                return Err(non_positive_step(name));
            }
            (*start..=*end).step_by(*step as usize).map(Decimal::from).collect()
        }
        ParameterRange::LinearDecimal { start, end, step } => {
            if step.is_sign_negative() || step.is_zero() {
                return Err(non_positive_step(name));
            }
            let mut vals = Vec::new();
            let mut current = *start;
            while current <= *end {
                vals.push(current);
                current += *step;
            }
            vals
        }
    };
    if values.is_empty() {
        return Err(OptimizerError::ParameterGeneration(format!("Range for '{name}' is empty.")));
    }
    Ok(values)
}

fn seed_values(range: &ParameterRange) -> Result<Vec<u64>, OptimizerError> {
    decimal_values("seed", range)?
        .into_iter()
        .map(|value| {
            let seed = if value.fract().is_zero() { value.to_u64() } else { None };
            seed.ok_or_else(|| {
                OptimizerError::ParameterGeneration(format!("Seed '{value}' is not a non-negative integer."))
            })
        })
        .collect()
}

fn non_positive_step(name: &str) -> OptimizerError {
    OptimizerError::ParameterGeneration(format!("Step for '{name}' must be positive."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_dimensions_fall_back_to_the_base_config() {
        let sets = generate_parameter_sets(&SweepConfig::default(), &Config::default()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].commission_rate, dec!(0.0025));
        assert_eq!(sets[0].order_fraction, dec!(0.2));
        assert_eq!(sets[0].seed, 42);
    }

    #[test]
    fn product_is_generated_in_a_fixed_order() {
        let sweep = SweepConfig {
            commission_rate: Some(ParameterRange::DiscreteDecimal(vec![dec!(0.001), dec!(0.0025)])),
            order_fraction: Some(ParameterRange::LinearDecimal {
                start: dec!(0.1),
                end: dec!(0.3),
                step: dec!(0.1),
            }),
            seed: Some(ParameterRange::LinearInt { start: 1, end: 2, step: 1 }),
        };
        let sets = generate_parameter_sets(&sweep, &Config::default()).unwrap();

        assert_eq!(sets.len(), 12);
        assert!(sets.iter().enumerate().all(|(i, s)| s.index == i));
        assert_eq!(
            (sets[0].commission_rate, sets[0].order_fraction, sets[0].seed),
            (dec!(0.001), dec!(0.1), 1)
        );
        assert_eq!(
            (sets[11].commission_rate, sets[11].order_fraction, sets[11].seed),
            (dec!(0.0025), dec!(0.3), 2)
        );
    }

    #[test]
    fn rejects_bad_ranges() {
        let zero_step = SweepConfig {
            order_fraction: Some(ParameterRange::LinearDecimal {
                start: dec!(0.1),
                end: dec!(0.3),
                step: Decimal::ZERO,
            }),
            ..SweepConfig::default()
        };
        assert!(generate_parameter_sets(&zero_step, &Config::default()).is_err());

        let fractional_seed = SweepConfig {
            seed: Some(ParameterRange::DiscreteDecimal(vec![dec!(1.5)])),
            ..SweepConfig::default()
        };
        assert!(generate_parameter_sets(&fractional_seed, &Config::default()).is_err());
    }

    #[test]
    fn apply_overrides_only_swept_fields() {
        let base = Config::default();
        let set = ParameterSet {
            index: 0,
            commission_rate: dec!(0.001),
            order_fraction: dec!(0.5),
            seed: 7,
        };
        let config = set.apply(&base);
        assert_eq!(config.simulation.commission_rate, dec!(0.001));
        assert_eq!(config.portfolio.order_fraction, dec!(0.5));
        assert_eq!(config.strategy.seed, 7);
        assert_eq!(config.backtest.initial_cash, base.backtest.initial_cash);
    }
}
