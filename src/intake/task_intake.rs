use anyhow::Context;
use sfb_types::tasks::TaskDescriptor;
use tracing::error;

/// Source of raw task payloads, independent of how they are delivered.
pub trait TaskIntake {
    /// Returns the raw payloads of every task delivered to the worker.
    fn messages(&self) -> anyhow::Result<Vec<String>>;

    /// Decodes the delivered payloads. Payloads that cannot be decoded are logged and skipped.
    fn tasks(&self) -> anyhow::Result<Vec<TaskDescriptor>> {
        Ok(self
            .messages()?
            .into_iter()
            .enumerate()
            .filter_map(|(index, message)| {
                match serde_json::from_str::<TaskDescriptor>(&message)
                    .with_context(|| format!("Cannot decode task payload #{index}."))
                {
                    Ok(descriptor) => Some(descriptor),
                    Err(err) => {
                        error!(intake.message = message, "Skipping task: {err:?}");
                        None
                    }
                }
            })
            .collect())
    }
}
