use crate::error::AnalyticsError;
use crate::ratios;
use crate::report::PerformanceReport;
use chrono::{DateTime, Duration, Utc};
use core_types::{DataEvent, FillEvent, FillSide, round_money};
use events::EngineEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sample of the equity curve, taken after an observation was processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: Decimal,
    /// Return relative to the previous point. Zero for the first point.
    pub equity_return: Decimal,
    /// Relative distance below the high-water mark. Never positive.
    pub drawdown: Decimal,
}

/// Accumulates the equity curve of a run and answers risk queries over it.
///
/// The deepest drawdown and the peak it fell from are tracked as points are
/// appended, so drawdown queries are O(1) regardless of curve length.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    event_history: Vec<EngineEvent>,
    transaction_history: Vec<FillEvent>,
    equity: Vec<EquityPoint>,
    high: Option<EquityPoint>,
    low: Option<EquityPoint>,
    high_index: usize,
    max_drawdown_index: usize,
    max_drawdown_peak_index: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an equity point for `observation` valued at `portfolio_value`.
    pub fn update(&mut self, observation: &DataEvent, portfolio_value: Decimal) {
        let equity_return = match self.equity.last() {
            Some(previous) => equity_return(previous.equity, portfolio_value),
            None => Decimal::ZERO,
        };
        let point = EquityPoint {
            timestamp: observation.timestamp(),
            equity: portfolio_value,
            equity_return,
            drawdown: self.drawdown_from_high(portfolio_value),
        };
        let index = self.equity.len();

        if self.high.as_ref().is_none_or(|high| point.equity >= high.equity) {
            self.high = Some(point.clone());
            self.high_index = index;
        }
        if self.low.as_ref().is_none_or(|low| point.equity <= low.equity) {
            self.low = Some(point.clone());
        }
        if index == 0 || point.drawdown < self.equity[self.max_drawdown_index].drawdown {
            self.max_drawdown_index = index;
            self.max_drawdown_peak_index = self.high_index;
        }

        tracing::debug!(
            timestamp = %point.timestamp,
            equity = %point.equity,
            equity_return = %point.equity_return,
            drawdown = %point.drawdown,
            "Statistics: recorded equity point"
        );
        self.equity.push(point);
    }

    fn drawdown_from_high(&self, equity: Decimal) -> Decimal {
        match &self.high {
            Some(high) if !high.equity.is_zero() && equity < high.equity => {
                round_money((equity - high.equity) / high.equity.abs())
            }
            _ => Decimal::ZERO,
        }
    }

    pub fn track_event(&mut self, event: EngineEvent) {
        self.event_history.push(event);
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.event_history
    }

    pub fn track_transaction(&mut self, fill: FillEvent) {
        self.transaction_history.push(fill);
    }

    pub fn transactions(&self) -> &[FillEvent] {
        &self.transaction_history
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity
    }

    /// The highest-equity point so far; ties go to the most recent.
    pub fn high(&self) -> Option<&EquityPoint> {
        self.high.as_ref()
    }

    /// The lowest-equity point so far; ties go to the most recent.
    pub fn low(&self) -> Option<&EquityPoint> {
        self.low.as_ref()
    }

    /// Per-point returns, including the zero return of the first point.
    pub fn returns(&self) -> Vec<Decimal> {
        self.equity.iter().map(|p| p.equity_return).collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// (last equity - first equity) / first equity
    pub fn total_equity_return(&self) -> Result<Decimal, AnalyticsError> {
        let (first, last) = match (self.equity.first(), self.equity.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnalyticsError::NoEquityData),
        };
        if first.equity.is_zero() {
            return Err(AnalyticsError::Calculation {
                metric: "total_equity_return".to_string(),
                reason: "first equity point is zero".to_string(),
            });
        }
        Ok(round_money((last.equity - first.equity) / first.equity))
    }

    /// The point with the most negative drawdown (first occurrence). A default
    /// point when nothing has been recorded.
    pub fn max_drawdown_point(&self) -> EquityPoint {
        self.equity.get(self.max_drawdown_index).cloned().unwrap_or_default()
    }

    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown_point().drawdown
    }

    pub fn max_drawdown_time(&self) -> DateTime<Utc> {
        self.max_drawdown_point().timestamp
    }

    /// Time from the peak preceding the deepest drawdown to that drawdown.
    pub fn max_drawdown_duration(&self) -> Duration {
        match (
            self.equity.get(self.max_drawdown_peak_index),
            self.equity.get(self.max_drawdown_index),
        ) {
            (Some(peak), Some(trough)) => trough.timestamp - peak.timestamp,
            _ => Duration::zero(),
        }
    }

    pub fn sharpe_ratio(&self, risk_free_rate: Decimal) -> Option<Decimal> {
        ratios::sharpe_ratio(&self.returns(), risk_free_rate).map(round_money)
    }

    pub fn sortino_ratio(&self, risk_free_rate: Decimal) -> Option<Decimal> {
        ratios::sortino_ratio(&self.returns(), risk_free_rate).map(round_money)
    }

    /// Builds a serializable snapshot of every metric.
    pub fn report(&self, risk_free_rate: Decimal) -> PerformanceReport {
        let mut report = PerformanceReport::new();
        let (Some(first), Some(last)) = (self.equity.first(), self.equity.last()) else {
            report.risk_free_rate = risk_free_rate;
            report.total_fills = self.transaction_history.len();
            return report;
        };

        report.initial_equity = first.equity;
        report.final_equity = last.equity;
        report.total_net_profit = round_money(last.equity - first.equity);
        report.total_return = self.total_equity_return().ok();

        report.max_drawdown = self.max_drawdown();
        report.max_drawdown_time = Some(self.max_drawdown_time());
        report.max_drawdown_duration = self.max_drawdown_duration().to_std().unwrap_or_default();
        report.risk_free_rate = risk_free_rate;
        report.sharpe_ratio = self.sharpe_ratio(risk_free_rate);
        report.sortino_ratio = self.sortino_ratio(risk_free_rate);
        report.calmar_ratio = match report.total_return {
            Some(total) if !report.max_drawdown.is_zero() => Some(round_money(total / report.max_drawdown.abs())),
            _ => None,
        };

        report.observations = self.equity.len();
        report.total_fills = self.transaction_history.len();
        report.buy_fills = self.transaction_history.iter().filter(|f| f.side == FillSide::Bought).count();
        report.sell_fills = report.total_fills - report.buy_fills;
        report.total_costs = self.transaction_history.iter().map(|f| f.cost).sum();

        report.high = self.high.clone();
        report.low = self.low.clone();
        report
    }
}

/// Relative change from `previous` to `current`. A zero `previous` counts as a
/// return of one.
fn equity_return(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ONE;
    }
    round_money((current - previous) / previous)
}
