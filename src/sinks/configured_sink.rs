use crate::{
    config::ComponentsConfig,
    sinks::{HttpSink, LogSink, MeasurementSink},
};
use sfb_types::measurements::MeasurementRecord;

/// Sink selected by the configuration: the ingestion endpoint if one is configured, the log
/// otherwise.
#[derive(Clone)]
pub enum ConfiguredSink {
    Log(LogSink),
    Http(HttpSink),
}

impl ConfiguredSink {
    pub fn new(config: &ComponentsConfig) -> Self {
        match config.sink_url {
            Some(ref url) => Self::Http(HttpSink::new(url.clone())),
            None => Self::Log(LogSink),
        }
    }
}

impl MeasurementSink for ConfiguredSink {
    async fn write(&self, record: &MeasurementRecord) -> anyhow::Result<()> {
        match self {
            Self::Log(sink) => sink.write(record).await,
            Self::Http(sink) => sink.write(record).await,
        }
    }
}
