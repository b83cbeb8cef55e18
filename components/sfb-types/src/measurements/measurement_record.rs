use crate::{measurements::FetchResult, tasks::TaskDescriptor};
use serde::Serialize;
use serde_with::{serde_as, skip_serializing_none, DurationMilliSeconds};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Record written to the measurement sink for every reported fetch.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Unique id of the record.
    pub id: Uuid,
    /// Task the fetch belongs to.
    #[serde(flatten)]
    pub task: TaskDescriptor,
    /// Time between the task creation and the moment the worker picked it up.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub env_init_duration: Duration,
    /// How late the worker passed the start gate.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub latency: Duration,
    /// HTTP status of the fetch, if any.
    pub status: Option<u16>,
    /// Whether the fetch counts as a success for the task.
    pub success: bool,
    /// Error message of a failed fetch.
    pub message: Option<String>,
    /// Size of the fetched payload.
    pub size_bytes: u64,
    /// Fetch latency.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub ms: Duration,
    /// Instant the fetch was observed.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

impl MeasurementRecord {
    /// Builds a record for the result of a fetch issued for the specified task.
    pub fn new(
        task: &TaskDescriptor,
        env_init_duration: Duration,
        latency: Duration,
        result: &FetchResult,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            task: task.clone(),
            env_init_duration,
            latency,
            status: result.outcome.status().map(|status| status.as_u16()),
            success: result.is_success(task.success_code),
            message: result.outcome.error().map(str::to_string),
            size_bytes: result.size_bytes,
            ms: result.latency,
            time: result.observed_at,
        }
    }

    /// Key used to partition records of the same task together.
    pub fn partition_key(&self) -> &str {
        &self.task.task_id
    }
}
