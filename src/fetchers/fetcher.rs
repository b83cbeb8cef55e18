use crate::{
    fetchers::{FetchDeadline, FetchError},
    tasks::TaskRun,
};
use sfb_types::measurements::FetchResult;
use std::{future::Future, sync::Arc};

/// Performs exactly one fetch of the run target and measures it.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches the run target. Every step of the fetch must complete before `deadline`.
    fn fetch(
        &self,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> impl Future<Output = Result<FetchResult, FetchError>> + Send;
}

impl<F: Fetcher> Fetcher for Arc<F> {
    fn fetch(
        &self,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> impl Future<Output = Result<FetchResult, FetchError>> + Send {
        self.as_ref().fetch(run, deadline)
    }
}
