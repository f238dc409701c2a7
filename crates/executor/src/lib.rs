//! # Hindsight Executor Crate
//!
//! This crate provides the core components for trade execution and portfolio state
//! management. It defines a generic `Executor` trait and provides a `SimulatedExecutor`
//! for backtesting, as well as a `Portfolio` manager to track the state of a trading account.
//!
//! ## Architectural Principles
//!
//! - **State vs. Logic Decoupling:** The `Executor` trait is a pure calculator that
//!   determines the effects of a trade (price, commission, fees) without mutating
//!   state. The `Portfolio` struct is the state machine that applies the results
//!   of a fill to the account balance and positions.
//! - **Pluggable Policy:** The `Portfolio` never decides order size itself; it runs
//!   every order through the injected `PositionSizer` and `RiskManager` hooks.
//!
//! ## Public API
//!
//! - `Executor`: The core trait for all execution engines.
//! - `SimulatedExecutor`: The "virtual exchange" for backtesting.
//! - `Portfolio`: The in-memory state manager for a trading account.
//! - `ExecutorError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod exchange;
pub mod portfolio;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExecutorError;
pub use exchange::{Executor, SimulatedExecutor};
pub use portfolio::Portfolio;
