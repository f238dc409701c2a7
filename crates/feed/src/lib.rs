//! # Hindsight Market Feed
//!
//! This crate provides the market-data side of the simulation: the `Feed`
//! trait every pipeline component queries for prices, and `HistoricFeed`, a
//! replayable, pre-sorted stream of observations that doubles as the engine's
//! "master clock".
//!
//! Acquiring and parsing raw data is someone else's job; this crate starts from
//! `DataEvent`s that are already in memory.

pub mod data_handler;
pub mod error;

pub use data_handler::{Feed, HistoricFeed, merge_streams};
pub use error::FeedError;
