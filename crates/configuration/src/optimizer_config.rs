use rust_decimal::Decimal;
use serde::Deserialize;

/// Defines a parameter sweep. This is deserialized from a `sweep.toml` file.
///
/// Each dimension is optional; a missing dimension uses the single value from
/// the base configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub commission_rate: Option<ParameterRange>,
    pub order_fraction: Option<ParameterRange>,
    pub seed: Option<ParameterRange>,
}

/// Represents a range of values for a single parameter to be tested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterRange {
    DiscreteInt(Vec<i64>),
    DiscreteDecimal(Vec<Decimal>),
    LinearInt { start: i64, end: i64, step: i64 },
    LinearDecimal { start: Decimal, end: Decimal, step: Decimal },
}
