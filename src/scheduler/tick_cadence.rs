use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defines how long the paced loop pauses after a batch before starting the next tick.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TickCadence {
    /// Sleep for what is left of the tick, so ticks start at a fixed rate regardless of how long
    /// a batch takes.
    Corrected,
    /// Always sleep for a whole tick after a batch; slow batches stretch the cadence.
    Flat,
}

impl TickCadence {
    /// Calculates the pause that follows a batch that took `batch_elapsed`.
    pub fn pause(&self, tick: Duration, batch_elapsed: Duration) -> Duration {
        match self {
            Self::Corrected => tick.saturating_sub(batch_elapsed),
            Self::Flat => tick,
        }
    }
}
