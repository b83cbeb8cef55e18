use crate::{
    config::FetchConfig,
    fetchers::{FetchDeadline, FetchError, Fetcher},
    sinks::MeasurementSink,
    tasks::TaskRun,
};
use sfb_types::measurements::{FetchResult, MeasurementRecord};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Runs a single fetch under the task deadline, turns every failure into a result and reports
/// the result to the sink if the task asks for it. `execute` never fails and returns within
/// `timeout + 2 * teardown_grace`.
pub struct FetchExecutor<F: Fetcher, S: MeasurementSink> {
    fetcher: F,
    sink: S,
    teardown_grace: Duration,
}

impl<F: Fetcher, S: MeasurementSink> FetchExecutor<F, S> {
    pub fn new(fetcher: F, sink: S, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            sink,
            teardown_grace: config.teardown_grace,
        }
    }

    /// Fetches the run target once.
    pub async fn execute(&self, run: &TaskRun) -> FetchResult {
        let descriptor = &run.descriptor;
        let deadline = FetchDeadline::start(descriptor.timeout);

        // Fetchers honor the deadline themselves, the outer guard only catches the ones that
        // don't return within the deadline plus the time given to release resources.
        let result = match timeout(
            descriptor.timeout + self.teardown_grace,
            self.fetcher.fetch(run, deadline),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => self.error_result(run, deadline, err),
            Err(_) => self.error_result(run, deadline, FetchError::Timeout(descriptor.timeout)),
        };

        match result.outcome.error() {
            Some(message) => warn!(
                task.id = descriptor.task_id,
                task.url = descriptor.url,
                fetch.latency = result.latency.as_millis(),
                "Fetch failed: {message}"
            ),
            None => debug!(
                task.id = descriptor.task_id,
                task.url = descriptor.url,
                fetch.status = result.outcome.status().map(|status| status.as_u16()),
                fetch.size_bytes = result.size_bytes,
                fetch.latency = result.latency.as_millis(),
                "Fetch completed."
            ),
        }

        if descriptor.report {
            let record = MeasurementRecord::new(
                descriptor,
                run.env_init_duration,
                run.latency,
                &result,
            );
            // The sink gets the same grace period as resource release, so it can't hold the
            // tick barrier.
            match timeout(self.teardown_grace, self.sink.write(&record)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(
                    task.id = descriptor.task_id,
                    record.id = %record.id,
                    "Failed to write measurement record: {err:?}"
                ),
                Err(_) => error!(
                    task.id = descriptor.task_id,
                    record.id = %record.id,
                    "Measurement record was not written within {}.",
                    humantime::format_duration(self.teardown_grace)
                ),
            }
        }

        result
    }

    fn error_result(&self, run: &TaskRun, deadline: FetchDeadline, err: FetchError) -> FetchResult {
        // The latency of a failed fetch never exceeds its budget.
        FetchResult::error(
            &run.descriptor.url,
            err.to_string(),
            deadline.elapsed().min(deadline.timeout()),
        )
    }
}
