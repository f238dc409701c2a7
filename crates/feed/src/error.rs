use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid observation in feed: {0}")]
    InvalidObservation(#[from] core_types::CoreError),

    #[error("Observations for {symbol} are out of order: {next} follows {previous}")]
    OutOfOrder {
        symbol: String,
        previous: String,
        next: String,
    },
}
