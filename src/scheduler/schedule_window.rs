use crate::error::Error as SfbError;
use anyhow::Context;
use sfb_types::tasks::TaskDescriptor;
use std::time::Duration;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Absolute instants that bound a task run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// The time at which the task was produced upstream, in UTC.
    pub created_at: OffsetDateTime,
    /// The time at which fetches must begin, in UTC.
    pub start_time: OffsetDateTime,
    /// The time after which no new tick starts, in UTC.
    pub end_time: Option<OffsetDateTime>,
}

impl ScheduleWindow {
    /// Returns how long ago (relative to `now`) the task was created. Tasks stamped in the future
    /// by a skewed upstream clock yield zero.
    pub fn since_created(&self, now: OffsetDateTime) -> Duration {
        positive_duration(now - self.created_at)
    }

    /// Returns how far past the start time `now` is.
    pub fn since_start(&self, now: OffsetDateTime) -> Duration {
        positive_duration(now - self.start_time)
    }

    /// Checks whether `now` is past the end time. Windows without an end time never end.
    pub fn has_ended(&self, now: OffsetDateTime) -> bool {
        self.end_time.is_some_and(|end_time| now > end_time)
    }
}

impl TryFrom<&TaskDescriptor> for ScheduleWindow {
    type Error = anyhow::Error;

    fn try_from(descriptor: &TaskDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: parse_timestamp("createdAt", &descriptor.created_at)?,
            start_time: parse_timestamp("startTime", &descriptor.start_time)?,
            end_time: descriptor
                .end_time()
                .map(|end_time| parse_timestamp("endTime", end_time))
                .transpose()?,
        })
    }
}

fn parse_timestamp(field: &str, value: &str) -> anyhow::Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .with_context(|| format!("Task `{field}` is not a valid RFC 3339 timestamp: {value:?}."))
        .map_err(|err| SfbError::malformed_task_with_root_cause(err).into())
}

fn positive_duration(duration: time::Duration) -> Duration {
    Duration::try_from(duration).unwrap_or_default()
}
