use crate::fetchers::FetchError;
use std::{future::Future, time::Duration};
use tokio::time::{timeout_at, Instant};

/// A single absolute deadline shared by every step of a fetch.
#[derive(Debug, Copy, Clone)]
pub struct FetchDeadline {
    started_at: Instant,
    timeout: Duration,
}

impl FetchDeadline {
    /// Arms a deadline `timeout` from now.
    pub fn start(timeout: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            timeout,
        }
    }

    /// The instant the fetch must be done by.
    pub fn instant(&self) -> Instant {
        self.started_at + self.timeout
    }

    /// The budget the deadline was armed with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time elapsed since the deadline was armed.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Time left until the deadline, zero once it passed.
    pub fn remaining(&self) -> Duration {
        self.instant().saturating_duration_since(Instant::now())
    }

    /// Runs `future` until it completes or the deadline passes.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, FetchError> {
        timeout_at(self.instant(), future)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))
    }
}
