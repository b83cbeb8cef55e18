use crate::intake::{SnsEvent, TaskIntake};
use anyhow::Context;
use std::io::Read;
use tracing::{debug, warn};

/// Tasks delivered as a notification event, read from a file or the standard input.
#[derive(Debug, Clone)]
pub struct EventIntake {
    event: String,
}

impl EventIntake {
    /// Creates intake for the serialized event.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }

    /// Reads the event from `path`, `-` stands for the standard input.
    pub fn read_from(path: &str) -> anyhow::Result<Self> {
        if path == "-" {
            let mut event = String::new();
            std::io::stdin()
                .read_to_string(&mut event)
                .context("Cannot read event from the standard input.")?;
            return Ok(Self::new(event));
        }

        Ok(Self::new(
            std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read event from `{path}`."))?,
        ))
    }
}

impl TaskIntake for EventIntake {
    fn messages(&self) -> anyhow::Result<Vec<String>> {
        let event = serde_json::from_str::<SnsEvent>(&self.event)
            .context("Cannot decode notification event.")?;
        if event.records.is_empty() {
            warn!("Notification event doesn't carry any task messages.");
        }

        Ok(event
            .records
            .into_iter()
            .map(|record| {
                debug!(
                    intake.message_id = record.sns.message_id.as_deref(),
                    "Received task message."
                );
                record.sns.message
            })
            .collect())
    }
}
