use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no price data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },
    #[error("not enough data for {symbol}: {count} rows (need {required})")]
    DataInsufficient {
        symbol: String,
        count: usize,
        required: usize,
    },
    #[error("external call failed: {0}")]
    ExternalCall(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("state file error: {0}")]
    State(String),
}

impl AppError {
    pub fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        AppError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Upstream(error.to_string())
    }
}
