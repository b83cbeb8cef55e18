use crate::scheduler::ScheduleWindow;
use sfb_types::tasks::TaskDescriptor;
use std::time::Duration;

/// A task that passed the start gate. Shared read-only by every fetch of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRun {
    /// The task as it was decoded from the payload.
    pub descriptor: TaskDescriptor,
    /// Parsed start and end instants of the task.
    pub window: ScheduleWindow,
    /// Time between the task creation and the moment the worker picked it up.
    pub env_init_duration: Duration,
    /// How late the start gate opened relative to the task start time.
    pub latency: Duration,
}
