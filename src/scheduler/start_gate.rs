use crate::config::SchedulerConfig;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::sleep;

/// Holds a task back until its start time. The bulk of the wait is a single sleep, the last
/// `poll_tail` is spent polling the wall clock so the gate never opens early even if the timer
/// fires ahead of the clock.
#[derive(Debug, Copy, Clone)]
pub struct StartGate {
    poll_interval: Duration,
    poll_tail: Duration,
}

impl StartGate {
    /// Creates a start gate with the polling settings from the scheduler config.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            poll_tail: config.poll_tail,
        }
    }

    /// Waits until the wall clock reaches `start_time` and returns the wall clock reading taken
    /// when the gate opened.
    pub async fn wait_until(&self, start_time: OffsetDateTime) -> OffsetDateTime {
        if let Ok(remaining) = Duration::try_from(start_time - OffsetDateTime::now_utc()) {
            if remaining > self.poll_tail {
                sleep(remaining - self.poll_tail).await;
            }
        }

        loop {
            let now = OffsetDateTime::now_utc();
            if now >= start_time {
                return now;
            }
            sleep(self.poll_interval).await;
        }
    }
}
