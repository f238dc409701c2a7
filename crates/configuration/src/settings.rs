use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for a backtest run.
///
/// Every section is optional in the file; missing sections and fields fall back
/// to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backtest: Backtest,
    pub simulation: Simulation,
    pub portfolio: PortfolioSettings,
    pub strategy: StrategySettings,
    pub statistics: StatisticsSettings,
    pub logging: Logging,
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.initial_cash < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "backtest.initial_cash must not be negative".to_string(),
            ));
        }
        if self.simulation.commission_rate < Decimal::ZERO || self.simulation.commission_rate >= Decimal::ONE {
            return Err(ConfigError::ValidationError(
                "simulation.commission_rate must be in [0, 1)".to_string(),
            ));
        }
        if self.simulation.exchange_fee < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "simulation.exchange_fee must not be negative".to_string(),
            ));
        }
        if self.portfolio.min_tradable_qty < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "portfolio.min_tradable_qty must not be negative".to_string(),
            ));
        }
        if self.portfolio.order_fraction <= Decimal::ZERO || self.portfolio.order_unit <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "portfolio.order_fraction and portfolio.order_unit must be greater than 0".to_string(),
            ));
        }
        let (buy, sell) = (self.strategy.buy_probability, self.strategy.sell_probability);
        if !(0.0..=1.0).contains(&buy) || !(0.0..=1.0).contains(&sell) || buy + sell > 1.0 {
            return Err(ConfigError::ValidationError(
                "strategy probabilities must each be in [0, 1] and sum to at most 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Backtest {
    /// The starting cash of the simulated portfolio.
    pub initial_cash: Decimal,
}

impl Default for Backtest {
    fn default() -> Self {
        Self {
            initial_cash: dec!(1000),
        }
    }
}

/// Contains parameters for the simulated exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Name of the single execution venue, stamped on every fill.
    pub venue: String,
    /// Fraction of traded value charged as commission.
    /// 0.0025 corresponds to 0.25%.
    pub commission_rate: Decimal,
    /// A fixed fee charged by the venue on every fill.
    pub exchange_fee: Decimal,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            venue: "simulated".to_string(),
            commission_rate: dec!(0.0025),
            exchange_fee: Decimal::ZERO,
        }
    }
}

/// What `Portfolio::reset` does with open positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Clear cash and the transaction log but leave positions untouched.
    #[default]
    KeepHoldings,
    /// Clear positions as well.
    ClearHoldings,
}

/// Order sizing and affordability rules applied by the portfolio.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    /// Holdings at or below this quantity are treated as dust and cannot be sold;
    /// a buy requires more cash than this quantity at the latest price.
    pub min_tradable_qty: Decimal,
    /// Fraction of `order_unit` placed per order by the fixed-fraction sizer.
    pub order_fraction: Decimal,
    /// The notional unit quantity the fraction applies to.
    pub order_unit: Decimal,
    pub reset_policy: ResetPolicy,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        Self {
            min_tradable_qty: dec!(0.2),
            order_fraction: dec!(0.2),
            order_unit: Decimal::ONE,
            reset_policy: ResetPolicy::default(),
        }
    }
}

/// Parameters for the reference random strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Seed for the strategy's random source. A fixed seed makes runs reproducible.
    pub seed: u64,
    pub buy_probability: f64,
    pub sell_probability: f64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            seed: 42,
            buy_probability: 0.2,
            sell_probability: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Per-period risk-free rate used for the Sharpe and Sortino ratios.
    pub risk_free_rate: Decimal,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: dec!(0.01),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
