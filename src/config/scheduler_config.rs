use crate::scheduler::TickCadence;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Configuration for the rate scheduler.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Interval between clock checks at the end of the start gate.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,
    /// Part of the start gate wait that is spent polling instead of sleeping.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_tail: Duration,
    /// Length of a single paced-load tick.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tick_interval: Duration,
    /// How the pause between ticks is calculated.
    pub cadence: TickCadence,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            poll_tail: Duration::from_millis(50),
            tick_interval: Duration::from_secs(1),
            cadence: TickCadence::Corrected,
        }
    }
}
