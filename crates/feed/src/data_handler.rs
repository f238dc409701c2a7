use crate::error::FeedError;
use chrono::{DateTime, Utc};
use core_types::DataEvent;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read access to market prices, as seen by strategies, the portfolio and the
/// exchange.
pub trait Feed {
    /// The most recent price known for `symbol` at or before `as_of`.
    ///
    /// Returns `None` when the symbol has not been observed yet.
    fn latest_price(&self, symbol: &str, as_of: DateTime<Utc>) -> Option<Decimal>;

    /// The most recent observation streamed for `symbol`.
    fn latest(&self, symbol: &str) -> Option<&DataEvent>;
}

/// A finite, chronologically ordered stream of observations that can be
/// replayed from the start.
///
/// Only observations that have already been streamed through
/// `next_observation` are visible to `Feed` queries, so nothing downstream can
/// look ahead.
#[derive(Debug, Clone)]
pub struct HistoricFeed {
    observations: Vec<DataEvent>,
    cursor: usize,
    // Per-symbol indices into `observations` of everything streamed so far.
    streamed: HashMap<String, Vec<usize>>,
}

impl HistoricFeed {
    /// Builds a feed from observations that are already in timestamp order.
    pub fn new(observations: Vec<DataEvent>) -> Result<Self, FeedError> {
        for observation in &observations {
            observation.validate()?;
        }
        if let Some(pair) = observations.windows(2).find(|w| w[1].timestamp() < w[0].timestamp()) {
            return Err(FeedError::OutOfOrder {
                symbol: pair[1].symbol().to_string(),
                previous: pair[0].timestamp().to_rfc3339(),
                next: pair[1].timestamp().to_rfc3339(),
            });
        }

        tracing::debug!(observations = observations.len(), "Historic feed prepared");
        Ok(Self {
            observations,
            cursor: 0,
            streamed: HashMap::new(),
        })
    }

    /// Builds a feed from one stream per symbol, merging them into a single
    /// chronological stream first.
    pub fn from_streams(streams: Vec<Vec<DataEvent>>) -> Result<Self, FeedError> {
        Self::new(merge_streams(streams))
    }

    /// Advances the master clock by one observation.
    pub fn next_observation(&mut self) -> Option<DataEvent> {
        let observation = self.observations.get(self.cursor)?.clone();
        self.streamed
            .entry(observation.symbol().to_string())
            .or_default()
            .push(self.cursor);
        self.cursor += 1;
        Some(observation)
    }

    /// Rewinds the stream to its first observation.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.streamed.clear();
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.observations.len()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations not streamed yet.
    pub fn remaining(&self) -> usize {
        self.observations.len() - self.cursor
    }

    pub fn observations(&self) -> &[DataEvent] {
        &self.observations
    }

    /// The distinct symbols in the stream, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.observations.iter().map(|o| o.symbol().to_string()).collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl Feed for HistoricFeed {
    fn latest_price(&self, symbol: &str, as_of: DateTime<Utc>) -> Option<Decimal> {
        let indices = self.streamed.get(symbol)?;
        let visible = indices.partition_point(|&i| self.observations[i].timestamp() <= as_of);
        let index = *indices.get(visible.checked_sub(1)?)?;
        Some(self.observations[index].latest_price())
    }

    fn latest(&self, symbol: &str) -> Option<&DataEvent> {
        let index = *self.streamed.get(symbol)?.last()?;
        self.observations.get(index)
    }
}

/// Merges per-symbol observation streams into a single, chronologically sorted
/// stream. This is the "Master Clock".
///
/// The sort is stable, so observations sharing a timestamp keep the order in
/// which their streams were supplied.
pub fn merge_streams(streams: Vec<Vec<DataEvent>>) -> Vec<DataEvent> {
    let mut all_events: Vec<DataEvent> = streams.into_iter().flatten().collect();
    all_events.sort_by_key(|event| event.timestamp());
    all_events
}
