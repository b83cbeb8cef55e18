mod api_fetcher;
mod fetch_deadline;
mod fetch_error;
mod fetch_executor;
mod fetcher;
mod identity_tag;
mod page_fetcher;
mod task_fetcher;
mod web_driver;

pub use self::{
    api_fetcher::ApiFetcher, fetch_deadline::FetchDeadline, fetch_error::FetchError,
    fetch_executor::FetchExecutor, fetcher::Fetcher, identity_tag::identity_tag,
    page_fetcher::PageFetcher, task_fetcher::TaskFetcher,
};

#[cfg(test)]
pub mod tests {
    use crate::{
        fetchers::{FetchDeadline, FetchError, Fetcher},
        tasks::TaskRun,
    };
    use http::StatusCode;
    use sfb_types::measurements::{FetchOutcome, FetchResult};
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    };
    use time::OffsetDateTime;
    use tokio::time::{sleep, Instant};

    /// A single call recorded by the [`MockFetcher`].
    #[derive(Debug, Copy, Clone)]
    pub struct FetchCall {
        pub started_at: Instant,
        /// Not set for calls that were abandoned before they completed.
        pub finished_at: Option<Instant>,
        pub wall_started_at: OffsetDateTime,
    }

    /// Fetcher that waits for `delay` and succeeds, recording every call.
    pub struct MockFetcher {
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: Mutex<Vec<FetchCall>>,
    }

    impl MockFetcher {
        pub fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Recorded calls, sorted by start.
        pub fn calls(&self) -> Vec<FetchCall> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort_by_key(|call| call.started_at);
            calls
        }

        /// The highest number of calls that were in flight at once.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    impl Fetcher for MockFetcher {
        async fn fetch(
            &self,
            run: &TaskRun,
            _: FetchDeadline,
        ) -> Result<FetchResult, FetchError> {
            let started_at = Instant::now();
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(FetchCall {
                    started_at,
                    finished_at: None,
                    wall_started_at: OffsetDateTime::now_utc(),
                });
                calls.len() - 1
            };
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

            sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.lock().unwrap()[call_index].finished_at = Some(Instant::now());

            Ok(FetchResult {
                url: run.descriptor.url.clone(),
                outcome: FetchOutcome::Status(StatusCode::OK),
                size_bytes: 0,
                latency: started_at.elapsed(),
                observed_at: OffsetDateTime::now_utc(),
            })
        }
    }
}
