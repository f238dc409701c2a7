use indicatif::style::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::ConfigError),

    #[error("Market feed error: {0}")]
    Feed(#[from] feed::FeedError),

    #[error("Backtest execution failed within optimizer: {0}")]
    Backtest(#[from] backtester::error::BacktestError),

    #[error("Parameter generation failed: {0}")]
    ParameterGeneration(String),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}

impl From<TemplateError> for OptimizerError {
    fn from(error: TemplateError) -> Self {
        OptimizerError::ProgressBarTemplate(error.to_string())
    }
}
