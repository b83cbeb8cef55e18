use crate::{
    config::Config,
    fetchers::{FetchExecutor, Fetcher},
    scheduler::RateScheduler,
    sinks::MeasurementSink,
};
use std::sync::Arc;

pub struct Api<F: Fetcher, S: MeasurementSink> {
    pub config: Config,
    pub scheduler: RateScheduler<F, S>,
}

impl<F: Fetcher, S: MeasurementSink> Api<F, S> {
    /// Instantiates APIs collection with the specified config, fetcher and measurement sink.
    pub fn new(config: Config, fetcher: F, sink: S) -> Self {
        let executor = Arc::new(FetchExecutor::new(fetcher, sink, &config.fetch));
        Self {
            scheduler: RateScheduler::new(config.scheduler, executor),
            config,
        }
    }
}
