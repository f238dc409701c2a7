//! # Hindsight Strategy Library
//!
//! This crate defines the universal `Strategy` trait the simulation engine
//! drives, plus the strategies shipped with the workspace.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Strategies only see the current observation, the feed
//!   and a read-only `PortfolioState`. They never touch execution or bookkeeping.
//! - **Reproducibility:** Any randomness is drawn from an injected, seeded
//!   source so that two runs with the same inputs produce the same signals.
//!
//! ## Public API
//!
//! - `Strategy`: The core trait all strategies implement.
//! - `RandomStrategy`: The placeholder reference strategy (random direction).
//! - `ScriptedStrategy`: Replays a fixed list of directions; used as a fixture.
//! - `create_strategy`: The factory function to construct a strategy instance.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod factory;
pub mod random;
pub mod scripted;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use factory::{StrategyId, create_strategy};
pub use random::RandomStrategy;
pub use scripted::ScriptedStrategy;

use core_types::{DataEvent, SignalEvent};
use events::PortfolioState;
use feed::Feed;

/// The core trait that all trading strategies must implement.
///
/// The `&mut self` in `calculate_signal` lets strategies keep their own state
/// (indicator history, a random source). The `Send + Sync` bounds allow
/// independent runs to be executed on different threads by the optimizer.
pub trait Strategy: Send + Sync {
    /// Evaluates the strategy for a new observation.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SignalEvent))` - if the strategy wants to express a direction.
    /// * `Ok(None)` - if no action should be taken on this observation.
    /// * `Err(StrategyError)` - if an error occurs during evaluation.
    fn calculate_signal(
        &mut self,
        observation: &DataEvent,
        feed: &dyn Feed,
        portfolio: &PortfolioState,
    ) -> Result<Option<SignalEvent>, StrategyError>;

    /// Returns the strategy to the state it was constructed in.
    fn reset(&mut self) {}
}
