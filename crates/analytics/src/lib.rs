//! # Hindsight Analytics Engine
//!
//! This crate provides the statistics side of a backtest: it records one equity
//! point per processed observation, tracks drawdown against the running
//! high-water mark, and derives the risk metrics of a run.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of feeds,
//!   portfolios or execution; it is handed an observation and a valuation.
//! - **Append-only History:** Equity points, tracked events and transactions are
//!   only ever appended. Queries never mutate.
//!
//! ## Public API
//!
//! - `Statistics`: The stateful equity-curve and risk engine.
//! - `EquityPoint`: One sample of the equity curve.
//! - `PerformanceReport`: A read-only snapshot handed to renderers.
//! - `ratios`: The pure mean / deviation / Sharpe / Sortino functions.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod ratios;
pub mod report;
pub mod statistics;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use report::PerformanceReport;
pub use statistics::{EquityPoint, Statistics};
