use crate::measurements::FetchOutcome;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;
use time::OffsetDateTime;

/// Measurement produced by exactly one fetch.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    /// URL the fetch was issued against.
    pub url: String,
    /// Status of the fetch or the reason it failed.
    pub outcome: FetchOutcome,
    /// Size of the fetched payload (response body or rendered snapshot).
    pub size_bytes: u64,
    /// Wall time from the fetch start to response headers or snapshot capture.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub latency: Duration,
    /// Instant the measurement was taken, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub observed_at: OffsetDateTime,
}

impl FetchResult {
    /// Creates a failed result for the specified URL.
    pub fn error(url: impl Into<String>, message: impl Into<String>, latency: Duration) -> Self {
        Self {
            url: url.into(),
            outcome: FetchOutcome::Error(message.into()),
            size_bytes: 0,
            latency,
            observed_at: OffsetDateTime::now_utc(),
        }
    }

    /// Checks whether the fetch succeeded. With `success_code` set the API status must match it
    /// exactly, otherwise any status below 400 counts as a success.
    pub fn is_success(&self, success_code: Option<u16>) -> bool {
        match &self.outcome {
            FetchOutcome::Status(status) => match success_code {
                Some(success_code) => status.as_u16() == success_code,
                None => !status.is_client_error() && !status.is_server_error(),
            },
            FetchOutcome::Rendered => true,
            FetchOutcome::Error(_) => false,
        }
    }
}
