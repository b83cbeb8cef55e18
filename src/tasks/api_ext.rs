use crate::{
    api::Api,
    error::Error as SfbError,
    fetchers::Fetcher,
    intake::TaskIntake,
    scheduler::RunSummary,
    sinks::MeasurementSink,
};
use sfb_types::tasks::TaskDescriptor;
use std::time::Instant;
use tracing::{error, info};

/// Describes the API to work with tasks.
pub struct TasksApi<'a, F: Fetcher, S: MeasurementSink> {
    api: &'a Api<F, S>,
}

impl<'a, F: Fetcher, S: MeasurementSink> TasksApi<'a, F, S> {
    /// Creates Tasks API.
    pub fn new(api: &'a Api<F, S>) -> Self {
        Self { api }
    }

    /// Runs a single task. Returns `None` if the task couldn't be run.
    pub async fn process(&self, descriptor: TaskDescriptor) -> Option<RunSummary> {
        let task_id = descriptor.task_id.clone();
        let task_type = descriptor.task_type.type_tag();
        let task_name = descriptor.name.clone();
        match self.api.scheduler.run(descriptor).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                error!(
                    task.id = task_id,
                    task.task_type = task_type,
                    task.name = task_name,
                    error.kind = ?err.downcast_ref::<SfbError>().map(SfbError::kind),
                    "Task will be skipped: {err}"
                );
                None
            }
        }
    }

    /// Runs every task delivered through `intake` one after another and returns the number of
    /// tasks that ran.
    pub async fn process_all(&self, intake: &dyn TaskIntake) -> anyhow::Result<usize> {
        let tasks = intake.tasks()?;
        let tasks_count = tasks.len();
        let process_start = Instant::now();

        let mut processed = 0;
        for descriptor in tasks {
            if self.process(descriptor).await.is_some() {
                processed += 1;
            }
        }

        info!(
            "Processed {processed} out of {tasks_count} tasks ({} elapsed).",
            humantime::format_duration(process_start.elapsed())
        );

        Ok(processed)
    }
}

impl<F: Fetcher, S: MeasurementSink> Api<F, S> {
    /// Returns an API to work with tasks.
    pub fn tasks(&self) -> TasksApi<'_, F, S> {
        TasksApi::new(self)
    }
}
