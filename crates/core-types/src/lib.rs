//! # Hindsight Core Types
//!
//! The shared vocabulary of the backtester: the event family that flows through
//! the simulation pipeline (observation → signal → order → fill), the per-symbol
//! `Position` record, and the single monetary rounding policy every other crate
//! applies before surfacing a value.
//!
//! As a Layer 0 crate it has no knowledge of feeds, strategies or portfolios.

pub mod enums;
pub mod error;
pub mod money;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{FillSide, OrderSide, OrderType};
pub use error::CoreError;
pub use money::{DECIMAL_PLACES, round_money, truncate_money};
pub use structs::{DataEvent, Event, FillEvent, OrderEvent, Position, SignalEvent};
