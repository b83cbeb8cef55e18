use crate::tasks::{LoadShape, TaskType};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, DurationMilliSeconds};
use std::time::Duration;

/// Per-fetch deadline used when the payload doesn't specify one.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(1000);

/// Declarative description of a single load generation run.
#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Target endpoint. Empty URL turns the task into a no-op.
    #[serde(default)]
    pub url: String,
    /// Kind of fetch to perform.
    #[serde(rename = "type", alias = "taskType", default)]
    pub task_type: TaskType,
    /// Human readable name of the task.
    #[serde(alias = "taskName")]
    pub name: Option<String>,
    /// Unique id of the task, used as the partition key for measurement records.
    #[serde(default)]
    pub task_id: String,
    /// Index of the client this worker represents within the task fan-out.
    #[serde(alias = "taskClient")]
    pub client: Option<u32>,
    /// Version of the deployment that produced the task.
    #[serde(default)]
    pub version: String,
    /// Region the worker runs in, also selects the region of the measurement sink.
    #[serde(default)]
    pub region: String,
    /// Kind of compute the worker runs on (e.g. `lambda`, `fargate`).
    #[serde(default)]
    pub compute: String,
    /// RFC 3339 instant at which the task was produced upstream.
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339 instant at which the fetches must begin.
    #[serde(default)]
    pub start_time: String,
    /// Optional RFC 3339 instant after which the paced loop stops issuing new ticks.
    pub end_time: Option<String>,
    /// Number of concurrent fetches per one-second tick.
    pub qps: Option<u32>,
    /// Total number of fetches across all clients.
    pub n: Option<u64>,
    /// Number of clients the total `n` is split between.
    #[serde(default = "default_clients")]
    pub c: u64,
    /// Number of fetches this worker issues when `n` is set.
    pub n_per_client: Option<u64>,
    /// Per-fetch deadline, in milliseconds on the wire.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// HTTP status a fetch must return to be considered successful.
    pub success_code: Option<u16>,
    /// Indicates whether every fetch result should be sent to the measurement sink.
    #[serde(default)]
    pub report: bool,
    /// Name of the measurement stream to write records to.
    pub kds: Option<String>,
}

fn default_clients() -> u64 {
    1
}

fn default_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

impl TaskDescriptor {
    /// Derives the load shape. `qps` takes precedence over `n`, zero `qps` is idle.
    pub fn load_shape(&self) -> LoadShape {
        match (self.qps, self.n) {
            (Some(0), _) => LoadShape::Idle,
            (Some(qps), _) => LoadShape::Paced { qps },
            (None, Some(n)) => LoadShape::FixedCount {
                count: self.n_per_client.unwrap_or(n / self.c.max(1)),
            },
            (None, None) => LoadShape::Idle,
        }
    }

    /// Returns the end time if one is set and not blank.
    pub fn end_time(&self) -> Option<&str> {
        self.end_time
            .as_deref()
            .map(str::trim)
            .filter(|end_time| !end_time.is_empty())
    }
}
