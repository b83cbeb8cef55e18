use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Outcome of a single fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FetchOutcome {
    /// HTTP response status received from an API target.
    Status(#[serde(with = "http_serde::status_code")] StatusCode),
    /// A web page was loaded and captured by the browser.
    Rendered,
    /// The fetch failed or hit its deadline.
    Error(String),
}

impl FetchOutcome {
    /// Returns the HTTP status, if the outcome carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchOutcome::Status(status) => Some(*status),
            FetchOutcome::Rendered | FetchOutcome::Error(_) => None,
        }
    }

    /// Returns the error message, if the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Error(message) => Some(message),
            FetchOutcome::Status(_) | FetchOutcome::Rendered => None,
        }
    }
}
