use crate::{
    config::Config,
    fetchers::{ApiFetcher, FetchDeadline, FetchError, Fetcher, PageFetcher},
    tasks::TaskRun,
};
use sfb_types::{measurements::FetchResult, tasks::TaskType};

/// Selects the fetch variant by the task type.
#[derive(Debug, Clone)]
pub struct TaskFetcher {
    api: ApiFetcher,
    page: PageFetcher,
}

impl TaskFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            api: ApiFetcher::new(config.fetch.product.clone()),
            page: PageFetcher::new(config),
        }
    }
}

impl Fetcher for TaskFetcher {
    async fn fetch(
        &self,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> Result<FetchResult, FetchError> {
        match run.descriptor.task_type {
            TaskType::Api => self.api.fetch(run, deadline).await,
            TaskType::RenderedPage => self.page.fetch(run, deadline).await,
        }
    }
}
