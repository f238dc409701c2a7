use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("No equity points recorded; process at least one observation first")]
    NoEquityData,

    #[error("Calculation error in metric '{metric}': {reason}")]
    Calculation { metric: String, reason: String },
}
