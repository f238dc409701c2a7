use anyhow::Context;
use chrono::{DateTime, Utc};
use core_types::DataEvent;
use feed::merge_streams;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// One row of the observation file: `timestamp,symbol,close[,open,high,low,volume]`.
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    timestamp: DateTime<Utc>,
    symbol: String,
    close: Decimal,
    #[serde(default)]
    open: Option<Decimal>,
    #[serde(default)]
    high: Option<Decimal>,
    #[serde(default)]
    low: Option<Decimal>,
    #[serde(default)]
    volume: Option<Decimal>,
}

impl From<ObservationRecord> for DataEvent {
    fn from(record: ObservationRecord) -> Self {
        let mut observation = DataEvent::new(record.timestamp, record.symbol, record.close);
        observation.open = record.open;
        observation.high = record.high;
        observation.low = record.low;
        observation.volume = record.volume;
        observation
    }
}

/// Reads an observation CSV and returns its rows in time order.
///
/// Rows for several symbols may be interleaved; rows sharing a timestamp keep
/// their file order.
pub fn load_observations(path: &Path) -> anyhow::Result<Vec<DataEvent>> {
    let file = File::open(path).with_context(|| format!("failed to open observation CSV {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut observations = Vec::new();
    for (line, result) in reader.deserialize::<ObservationRecord>().enumerate() {
        let record = result.with_context(|| format!("failed to parse CSV row {}", line + 1))?;
        observations.push(DataEvent::from(record));
    }
    tracing::info!(rows = observations.len(), path = %path.display(), "Loaded observations");

    Ok(merge_streams(vec![observations]))
}
