use crate::sinks::MeasurementSink;
use sfb_types::measurements::MeasurementRecord;
use tracing::info;

/// Emits records as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MeasurementSink for LogSink {
    async fn write(&self, record: &MeasurementRecord) -> anyhow::Result<()> {
        info!(
            record.id = %record.id,
            record.partition_key = record.partition_key(),
            record.stream = record.task.kds.as_deref(),
            record = serde_json::to_string(record)?,
            "Measurement record."
        );
        Ok(())
    }
}
