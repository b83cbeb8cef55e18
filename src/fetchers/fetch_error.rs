use std::time::Duration;
use thiserror::Error;

/// Reasons a single fetch can fail. None of them abort the task run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch did not complete within {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("browser error: {0}")]
    Browser(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.into())
    }
}
