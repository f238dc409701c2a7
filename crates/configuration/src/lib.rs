use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod optimizer_config;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use optimizer_config::{ParameterRange, SweepConfig};
pub use settings::{
    Backtest, Config, Logging, PortfolioSettings, ResetPolicy, Simulation, StatisticsSettings, StrategySettings,
};

/// Loads the run configuration from a TOML file.
///
/// Values may be overridden from the environment with the `HINDSIGHT_` prefix
/// and `__` as the section separator, e.g. `HINDSIGHT_SIMULATION__COMMISSION_RATE`.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix("HINDSIGHT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

/// Loads a parameter sweep definition from a TOML file.
pub fn load_sweep_config(path: impl AsRef<Path>) -> Result<SweepConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .build()?;

    Ok(builder.try_deserialize::<SweepConfig>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_toml(
            r#"
            [simulation]
            venue = "poloniex"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.simulation.venue, "poloniex");
        assert_eq!(config.simulation.commission_rate, dec!(0.0025));
        assert_eq!(config.backtest.initial_cash, dec!(1000));
        assert_eq!(config.portfolio.min_tradable_qty, dec!(0.2));
        assert_eq!(config.portfolio.reset_policy, ResetPolicy::KeepHoldings);
        assert_eq!(config.statistics.risk_free_rate, dec!(0.01));
    }

    #[test]
    fn reset_policy_is_read_from_snake_case() {
        let file = write_toml(
            r#"
            [portfolio]
            reset_policy = "clear_holdings"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.portfolio.reset_policy, ResetPolicy::ClearHoldings);
    }

    #[test]
    fn invalid_probabilities_are_rejected() {
        let file = write_toml(
            r#"
            [strategy]
            buy_probability = 0.7
            sell_probability = 0.6
            "#,
        );
        assert!(matches!(load_config(file.path()), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn environment_overrides_use_single_underscore_prefix() {
        let file = write_toml(
            r#"
            [simulation]
            exchange_fee = "0.1"
            "#,
        );
        // SAFETY: no other test in this crate reads or writes this variable.
        unsafe { std::env::set_var("HINDSIGHT_SIMULATION__EXCHANGE_FEE", "0.35") };
        let loaded = load_config(file.path());
        unsafe { std::env::remove_var("HINDSIGHT_SIMULATION__EXCHANGE_FEE") };

        assert_eq!(loaded.unwrap().simulation.exchange_fee, dec!(0.35));
    }

    #[test]
    fn sweep_ranges_parse_both_shapes() {
        let file = write_toml(
            r#"
            seed = [1, 2, 3]
            order_fraction = { start = 0.1, end = 0.3, step = 0.1 }
            "#,
        );
        let sweep = load_sweep_config(file.path()).unwrap();
        assert_eq!(sweep.seed, Some(ParameterRange::DiscreteInt(vec![1, 2, 3])));
        assert!(matches!(sweep.order_fraction, Some(ParameterRange::LinearDecimal { .. })));
        assert!(sweep.commission_rate.is_none());
    }
}
