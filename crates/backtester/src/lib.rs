//! # Hindsight Backtester
//!
//! The simulation engine. It drives one observation at a time through the
//! pipeline: strategy → portfolio sizing → execution → portfolio fill →
//! mark-to-market → statistics.
//!
//! ## Public API
//!
//! - `Backtester`: Owns every component of a single run.
//! - `StepOutcome`: What happened while processing one observation.
//! - `RunSummary`: Counters, surfaced failures and the final `PerformanceReport`.

use crate::error::BacktestError;
use analytics::{PerformanceReport, Statistics};
use configuration::{Config, ResetPolicy};
use core_types::{DataEvent, FillEvent, OrderEvent, SignalEvent};
use events::EngineEvent;
use executor::{Executor, ExecutorError, Portfolio, SimulatedExecutor};
use feed::HistoricFeed;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use strategies::{Strategy, StrategyId, create_strategy};

pub mod error;

/// Everything that happened while one observation went through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: DataEvent,
    pub signal: Option<SignalEvent>,
    pub order: Option<OrderEvent>,
    pub fill: Option<FillEvent>,
    /// The portfolio declined to turn the signal into an order.
    pub rejection: Option<ExecutorError>,
    /// The order could not be priced; no fill was produced.
    pub failure: Option<ExecutorError>,
    /// Portfolio value recorded for this observation.
    pub equity: Decimal,
}

impl StepOutcome {
    fn new(observation: DataEvent) -> Self {
        Self {
            observation,
            signal: None,
            order: None,
            fill: None,
            rejection: None,
            failure: None,
            equity: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedSignal {
    pub signal: SignalEvent,
    pub reason: ExecutorError,
}

/// An order (or the signal that would have produced it) that was aborted
/// because no price was available.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedOrder {
    pub signal: SignalEvent,
    pub order: Option<OrderEvent>,
    pub reason: ExecutorError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub observations: usize,
    pub signals: usize,
    pub orders: usize,
    pub fills: usize,
    pub rejected_signals: Vec<RejectedSignal>,
    pub failed_orders: Vec<FailedOrder>,
    pub report: PerformanceReport,
}

impl RunSummary {
    fn record(&mut self, outcome: StepOutcome) {
        self.observations += 1;
        self.orders += usize::from(outcome.order.is_some());
        self.fills += usize::from(outcome.fill.is_some());

        let Some(signal) = outcome.signal else {
            return;
        };
        self.signals += 1;
        if let Some(reason) = outcome.rejection {
            self.rejected_signals.push(RejectedSignal { signal, reason });
        } else if let Some(reason) = outcome.failure {
            self.failed_orders.push(FailedOrder {
                signal,
                order: outcome.order,
                reason,
            });
        }
    }
}

/// The main backtesting engine.
///
/// A run is single-threaded and fully deterministic for a given feed, strategy
/// seed and configuration. Independent runs share nothing and can be executed
/// in parallel by the optimizer.
pub struct Backtester {
    // --- Components ---
    feed: HistoricFeed,
    portfolio: Portfolio,
    strategy: Box<dyn Strategy>,
    executor: Box<dyn Executor>,
    statistics: Statistics,
    // --- Context ---
    risk_free_rate: Decimal,
    reset_policy: ResetPolicy,
    show_progress: bool,
}

impl Backtester {
    pub fn new(
        feed: HistoricFeed,
        portfolio: Portfolio,
        strategy: Box<dyn Strategy>,
        executor: Box<dyn Executor>,
        risk_free_rate: Decimal,
    ) -> Self {
        Self {
            feed,
            portfolio,
            strategy,
            executor,
            statistics: Statistics::new(),
            risk_free_rate,
            reset_policy: ResetPolicy::default(),
            show_progress: false,
        }
    }

    /// Wires a run from a validated configuration with the reference strategy
    /// and the simulated exchange.
    pub fn from_config(config: &Config, feed: HistoricFeed) -> Result<Self, BacktestError> {
        let portfolio = Portfolio::from_settings(config.backtest.initial_cash, &config.portfolio)?;
        let strategy = create_strategy(StrategyId::Random, &config.strategy)?;
        let executor = Box::new(SimulatedExecutor::new(config.simulation.clone()));

        let mut backtester = Self::new(feed, portfolio, strategy, executor, config.statistics.risk_free_rate);
        backtester.reset_policy = config.portfolio.reset_policy;
        Ok(backtester)
    }

    /// Shows an `indicatif` progress bar while `run` is looping.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Processes the next observation. Returns `Ok(None)` once the feed is exhausted.
    ///
    /// Rejected signals and unpriceable orders are reported in the outcome and
    /// do not stop the run; a strategy error does.
    pub fn step(&mut self) -> Result<Option<StepOutcome>, BacktestError> {
        let Some(observation) = self.feed.next_observation() else {
            return Ok(None);
        };
        self.statistics.track_event(EngineEvent::Data(observation.clone()));
        let mut outcome = StepOutcome::new(observation.clone());

        // --- 1. STRATEGY EVALUATION ---
        let state = self.portfolio.state(observation.timestamp());
        let signal = self.strategy.calculate_signal(&observation, &self.feed, &state)?;

        // --- 2. SIGNAL → ORDER → FILL ---
        if let Some(signal) = signal {
            self.statistics.track_event(EngineEvent::Signal(signal.clone()));
            match self.portfolio.on_signal(&signal, &self.feed) {
                Ok(order) => {
                    self.statistics.track_event(EngineEvent::Order(order.clone()));
                    match self.executor.execute_order(&order, &self.feed) {
                        Ok(fill) => {
                            let fill = self.portfolio.on_fill(fill).clone();
                            self.statistics.track_event(EngineEvent::Fill(fill.clone()));
                            self.statistics.track_transaction(fill.clone());
                            outcome.fill = Some(fill);
                        }
                        Err(reason) => {
                            tracing::warn!(symbol = %order.event.symbol, error = %reason, "Order aborted");
                            outcome.failure = Some(reason);
                        }
                    }
                    outcome.order = Some(order);
                }
                Err(reason) if reason.is_rejection() => {
                    tracing::debug!(symbol = %signal.event.symbol, reason = %reason, "Signal rejected");
                    outcome.rejection = Some(reason);
                }
                Err(reason) => {
                    tracing::warn!(symbol = %signal.event.symbol, error = %reason, "Order aborted");
                    outcome.failure = Some(reason);
                }
            }
            outcome.signal = Some(signal);
        }

        // --- 3. MARK-TO-MARKET AND RECORD EQUITY ---
        self.portfolio.update(&observation);
        outcome.equity = self.portfolio.value();
        self.statistics.update(&observation, outcome.equity);

        Ok(Some(outcome))
    }

    /// Runs the simulation until the feed is exhausted.
    pub fn run(&mut self) -> Result<RunSummary, BacktestError> {
        let progress_bar = if self.show_progress {
            ProgressBar::new(self.feed.remaining() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );

        tracing::info!(
            observations = self.feed.remaining(),
            initial_cash = %self.portfolio.initial_cash(),
            "Starting backtest run"
        );

        let mut summary = RunSummary::default();
        while let Some(outcome) = self.step()? {
            summary.record(outcome);
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("Simulation complete.");

        summary.report = self.statistics.report(self.risk_free_rate);
        tracing::info!(
            observations = summary.observations,
            fills = summary.fills,
            rejected = summary.rejected_signals.len(),
            failed = summary.failed_orders.len(),
            final_equity = %summary.report.final_equity,
            "Backtest run finished"
        );
        Ok(summary)
    }

    /// Rewinds feed, strategy, portfolio and statistics so that running again
    /// reproduces the identical equity sequence. Holdings are always cleared
    /// and cash is restored to the initial cash.
    pub fn reset(&mut self) {
        self.feed.reset();
        self.strategy.reset();
        self.statistics.reset();
        self.portfolio.reset(ResetPolicy::ClearHoldings);
        let initial_cash = self.portfolio.initial_cash();
        self.portfolio.set_cash(initial_cash);
    }

    /// Rewinds only the portfolio, applying the configured reset policy, and
    /// restores cash to the initial cash.
    pub fn reset_portfolio(&mut self) {
        self.portfolio.reset(self.reset_policy);
        let initial_cash = self.portfolio.initial_cash();
        self.portfolio.set_cash(initial_cash);
    }

    pub fn feed(&self) -> &HistoricFeed {
        &self.feed
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn portfolio_mut(&mut self) -> &mut Portfolio {
        &mut self.portfolio
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn report(&self) -> PerformanceReport {
        self.statistics.report(self.risk_free_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use configuration::Simulation;
    use core_types::OrderSide;
    use events::PortfolioState;
    use feed::Feed;
    use rust_decimal_macros::dec;
    use strategies::{ScriptedStrategy, StrategyError};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 12, 10, 15, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn feed(prices: &[Decimal]) -> HistoricFeed {
        let observations = prices
            .iter()
            .enumerate()
            .map(|(i, p)| DataEvent::new(at(i as i64), "USDT-ETH", *p))
            .collect();
        HistoricFeed::new(observations).unwrap()
    }

    fn backtester(prices: &[Decimal], strategy: Box<dyn Strategy>) -> Backtester {
        let executor = SimulatedExecutor::new(Simulation {
            venue: "simulated".to_string(),
            commission_rate: dec!(0.0025),
            exchange_fee: Decimal::ZERO,
        });
        Backtester::new(feed(prices), Portfolio::new(dec!(1000)), strategy, Box::new(executor), dec!(0.01))
    }

    fn scripted(script: Vec<Option<OrderSide>>) -> Box<dyn Strategy> {
        Box::new(ScriptedStrategy::new(script))
    }

    /// Always asks to buy a symbol the feed never produces.
    struct ForeignSymbol;

    impl Strategy for ForeignSymbol {
        fn calculate_signal(
            &mut self,
            observation: &DataEvent,
            _feed: &dyn Feed,
            _portfolio: &PortfolioState,
        ) -> Result<Option<SignalEvent>, StrategyError> {
            Ok(Some(SignalEvent::new(observation.timestamp(), "USDT-BTC", Some(OrderSide::Buy))))
        }
    }

    struct Broken;

    impl Strategy for Broken {
        fn calculate_signal(
            &mut self,
            _observation: &DataEvent,
            _feed: &dyn Feed,
            _portfolio: &PortfolioState,
        ) -> Result<Option<SignalEvent>, StrategyError> {
            Err(StrategyError::InvalidParameters("broken".to_string()))
        }
    }

    #[test]
    fn first_step_buys_and_records_equity() {
        let mut backtester = backtester(&[dec!(100)], scripted(vec![Some(OrderSide::Buy)]));
        let outcome = backtester.step().unwrap().unwrap();

        let fill = outcome.fill.unwrap();
        assert_eq!(fill.quantity, dec!(0.2));
        assert_eq!(fill.commission, dec!(0.05));
        assert_eq!(backtester.portfolio().cash(), dec!(979.95));
        assert_eq!(outcome.equity, dec!(999.95));
        assert_eq!(backtester.statistics().equity_curve().len(), 1);
        // data, signal, order, fill
        assert_eq!(backtester.statistics().events().len(), 4);
        assert!(backtester.step().unwrap().is_none());
    }

    #[test]
    fn run_counts_fills_and_rejections() {
        let script = vec![Some(OrderSide::Buy), Some(OrderSide::Buy), Some(OrderSide::Sell), Some(OrderSide::Sell)];
        let mut backtester = backtester(&[dec!(100), dec!(110), dec!(90), dec!(120)], scripted(script));
        let summary = backtester.run().unwrap();

        assert_eq!(summary.observations, 4);
        assert_eq!(summary.signals, 4);
        assert_eq!(summary.orders, 3);
        assert_eq!(summary.fills, 3);
        assert!(summary.failed_orders.is_empty());
        assert_eq!(summary.rejected_signals.len(), 1);
        assert!(matches!(
            summary.rejected_signals[0].reason,
            ExecutorError::InsufficientHoldings { .. }
        ));

        // 1000 - 20.05 - 22.055 + 17.955
        assert_eq!(backtester.portfolio().cash(), dec!(975.85));
        assert_eq!(summary.report.observations, 4);
        assert_eq!(summary.report.total_fills, 3);
        assert_eq!(summary.report.initial_equity, dec!(999.95));
    }

    #[test]
    fn reset_then_rerun_reproduces_the_equity_curve() {
        let script = vec![Some(OrderSide::Buy), Some(OrderSide::Buy), None, Some(OrderSide::Sell)];
        let mut backtester = backtester(&[dec!(100), dec!(110), dec!(90), dec!(120)], scripted(script));
        let first = backtester.run().unwrap();
        let first_curve = backtester.statistics().equity_curve().to_vec();

        backtester.reset();
        assert_eq!(backtester.portfolio().cash(), dec!(1000));
        assert!(backtester.portfolio().positions().is_empty());
        assert!(backtester.statistics().equity_curve().is_empty());

        let second = backtester.run().unwrap();
        assert_eq!(backtester.statistics().equity_curve(), first_curve.as_slice());
        assert_eq!(second, first);
    }

    #[test]
    fn reset_portfolio_applies_configured_policy() {
        let mut backtester = backtester(&[dec!(100)], scripted(vec![Some(OrderSide::Buy)]));
        backtester.run().unwrap();

        backtester.reset_portfolio();
        assert_eq!(backtester.portfolio().cash(), dec!(1000));
        assert!(backtester.portfolio().transactions().is_empty());
        // KeepHoldings is the default policy.
        assert_eq!(backtester.portfolio().position("USDT-ETH").unwrap().quantity, dec!(0.2));
    }

    #[test]
    fn unpriceable_orders_are_surfaced_and_the_run_continues() {
        let mut backtester = backtester(&[dec!(100), dec!(101), dec!(102)], Box::new(ForeignSymbol));
        let summary = backtester.run().unwrap();

        assert_eq!(summary.observations, 3);
        assert_eq!(summary.fills, 0);
        assert_eq!(summary.failed_orders.len(), 3);
        assert_eq!(summary.failed_orders[0].reason, ExecutorError::NoPriceData("USDT-BTC".to_string()));
        assert_eq!(backtester.statistics().equity_curve().len(), 3);
        assert!(backtester.statistics().equity_curve().iter().all(|p| p.equity == dec!(1000)));
    }

    #[test]
    fn strategy_errors_stop_the_run() {
        let mut backtester = backtester(&[dec!(100)], Box::new(Broken));
        assert!(matches!(backtester.run(), Err(BacktestError::Strategy(_))));
    }
}
