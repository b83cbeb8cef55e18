use sfb_types::measurements::MeasurementRecord;
use std::{future::Future, sync::Arc};

/// Destination of the measurement records of reported fetches.
pub trait MeasurementSink: Send + Sync + 'static {
    /// Writes a single record.
    fn write(&self, record: &MeasurementRecord) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<S: MeasurementSink> MeasurementSink for Arc<S> {
    fn write(&self, record: &MeasurementRecord) -> impl Future<Output = anyhow::Result<()>> + Send {
        self.as_ref().write(record)
    }
}
