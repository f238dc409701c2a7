//! # Hindsight Events
//!
//! This crate defines the envelope types that leave the simulation loop:
//! the `EngineEvent` log tracked by the statistics engine and the read-only
//! `PortfolioState` snapshot handed to strategies and reporting sinks.
//!
//! As a Layer 0 crate, it depends only on `core-types`.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{EngineEvent, PortfolioState};
