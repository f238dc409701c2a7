use crate::statistics::EquityPoint;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A standardized snapshot of a run's performance.
///
/// This struct is the final output of `Statistics::report` and serves as the
/// data transfer object for results handed to the CLI and the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Core Profitability Metrics
    pub initial_equity: Decimal,
    pub final_equity: Decimal,
    pub total_net_profit: Decimal,
    pub total_return: Option<Decimal>, // None when the first equity point is zero

    // II. Risk and Drawdown
    pub max_drawdown: Decimal,
    pub max_drawdown_time: Option<DateTime<Utc>>,
    #[serde(with = "humantime_serde")]
    pub max_drawdown_duration: Duration,
    pub risk_free_rate: Decimal,
    pub sharpe_ratio: Option<Decimal>,  // None with fewer than two returns or no deviation
    pub sortino_ratio: Option<Decimal>, // None with fewer than two losing periods
    pub calmar_ratio: Option<Decimal>,  // None for cases with no drawdown

    // III. Trade-Level Statistics
    pub observations: usize,
    pub total_fills: usize,
    pub buy_fills: usize,
    pub sell_fills: usize,
    pub total_costs: Decimal,

    // IV. Watermarks
    pub high: Option<EquityPoint>,
    pub low: Option<EquityPoint>,
}

impl PerformanceReport {
    /// Creates a new, zeroed-out PerformanceReport.
    pub fn new() -> Self {
        Self {
            initial_equity: Decimal::ZERO,
            final_equity: Decimal::ZERO,
            total_net_profit: Decimal::ZERO,
            total_return: None,
            max_drawdown: Decimal::ZERO,
            max_drawdown_time: None,
            max_drawdown_duration: Duration::ZERO,
            risk_free_rate: Decimal::ZERO,
            sharpe_ratio: None,
            sortino_ratio: None,
            calmar_ratio: None,
            observations: 0,
            total_fills: 0,
            buy_fills: 0,
            sell_fills: 0,
            total_costs: Decimal::ZERO,
            high: None,
            low: None,
        }
    }
}

impl Default for PerformanceReport {
    fn default() -> Self {
        Self::new()
    }
}
