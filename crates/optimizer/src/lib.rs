//! # Hindsight Optimizer
//!
//! Runs a parameter sweep: every combination of the swept parameters becomes
//! an independent backtest with its own feed, portfolio, strategy and
//! statistics. Runs share nothing and are executed in parallel with `rayon`.

use crate::error::OptimizerError;
use crate::generator::{ParameterSet, generate_parameter_sets};
use backtester::{Backtester, RunSummary};
use configuration::{Config, SweepConfig};
use core_types::DataEvent;
use feed::HistoricFeed;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

pub mod error;
pub mod generator;

/// The outcome of one run of the sweep.
#[derive(Debug)]
pub struct SweepResult {
    pub parameters: ParameterSet,
    pub outcome: Result<RunSummary, OptimizerError>,
}

pub struct Optimizer {
    sweep: SweepConfig,
    base_config: Config,
    observations: Vec<DataEvent>,
    show_progress: bool,
}

impl Optimizer {
    pub fn new(sweep: SweepConfig, base_config: Config, observations: Vec<DataEvent>) -> Self {
        Self {
            sweep,
            base_config,
            observations,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Executes every parameter set and returns the results ordered by
    /// parameter-set index. A failing run does not abort the sweep.
    pub fn run(&self) -> Result<Vec<SweepResult>, OptimizerError> {
        let parameter_sets = generate_parameter_sets(&self.sweep, &self.base_config)?;
        let total_runs = parameter_sets.len();

        tracing::info!(
            runs = total_runs,
            threads = rayon::current_num_threads(),
            "Starting parameter sweep"
        );

        let progress_bar = if self.show_progress {
            ProgressBar::new(total_runs as u64)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );

        let mut results: Vec<SweepResult> = parameter_sets
            .into_par_iter()
            .map(|parameters| {
                let outcome = self.execute_single_backtest(&parameters);
                if let Err(e) = &outcome {
                    tracing::warn!(index = parameters.index, error = %e, "A sweep run failed");
                }
                progress_bar.inc(1);
                SweepResult { parameters, outcome }
            })
            .collect();
        results.sort_by_key(|result| result.parameters.index);

        progress_bar.finish_with_message("Sweep complete.");
        Ok(results)
    }

    fn execute_single_backtest(&self, parameters: &ParameterSet) -> Result<RunSummary, OptimizerError> {
        let config = parameters.apply(&self.base_config);
        config.validate()?;

        let feed = HistoricFeed::new(self.observations.clone())?;
        let mut backtester = Backtester::from_config(&config, feed)?;
        Ok(backtester.run()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use configuration::ParameterRange;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn observations(n: i64) -> Vec<DataEvent> {
        let start = Utc.with_ymd_and_hms(2017, 12, 10, 15, 0, 0).unwrap();
        (0..n)
            .map(|i| DataEvent::new(start + Duration::minutes(i), "USDT-ETH", dec!(100) + Decimal::from(i % 7)))
            .collect()
    }

    fn sweep() -> SweepConfig {
        SweepConfig {
            commission_rate: Some(ParameterRange::DiscreteDecimal(vec![dec!(0.001), dec!(0.0025)])),
            order_fraction: None,
            seed: Some(ParameterRange::DiscreteInt(vec![1, 2, 3])),
        }
    }

    #[test]
    fn results_are_ordered_and_complete() {
        let optimizer = Optimizer::new(sweep(), Config::default(), observations(50));
        let results = optimizer.run().unwrap();

        assert_eq!(results.len(), 6);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.parameters.index, i);
            let summary = result.outcome.as_ref().unwrap();
            assert_eq!(summary.observations, 50);
        }
    }

    #[test]
    fn parallel_runs_match_sequential_runs() {
        let optimizer = Optimizer::new(sweep(), Config::default(), observations(40));
        let results = optimizer.run().unwrap();

        for result in &results {
            let config = result.parameters.apply(&Config::default());
            let mut backtester = Backtester::from_config(&config, HistoricFeed::new(observations(40)).unwrap()).unwrap();
            let sequential = backtester.run().unwrap();
            assert_eq!(result.outcome.as_ref().unwrap(), &sequential);
        }
    }

    #[test]
    fn invalid_runs_are_reported_without_aborting_the_sweep() {
        let sweep = SweepConfig {
            commission_rate: Some(ParameterRange::DiscreteDecimal(vec![dec!(0.001), dec!(1.5)])),
            ..SweepConfig::default()
        };
        let results = Optimizer::new(sweep, Config::default(), observations(10)).run().unwrap();

        assert!(results[0].outcome.is_ok());
        assert!(matches!(results[1].outcome, Err(OptimizerError::Config(_))));
    }
}
