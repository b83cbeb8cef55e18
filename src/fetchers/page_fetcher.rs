use crate::{
    config::Config,
    fetchers::{
        identity_tag,
        web_driver::{NewSessionRequest, WebDriver, WebDriverSession},
        FetchDeadline, FetchError, Fetcher,
    },
    tasks::TaskRun,
};
use sfb_types::measurements::{FetchOutcome, FetchResult};
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

/// Loads the run target in a browser reached through WebDriver and captures a snapshot of the
/// rendered page.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    web_driver_url: Url,
    product: String,
    browser_name: String,
    headless: bool,
    teardown_grace: Duration,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            web_driver_url: config.components.web_driver_url.clone(),
            product: config.fetch.product.clone(),
            browser_name: config.fetch.browser_name.clone(),
            headless: config.fetch.headless,
            teardown_grace: config.fetch.teardown_grace,
        }
    }

    async fn capture(
        &self,
        session: &WebDriverSession,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> Result<FetchResult, FetchError> {
        deadline
            .run(session.set_page_load_timeout(deadline.remaining()))
            .await??;

        let started_at = Instant::now();
        deadline.run(session.navigate(&run.descriptor.url)).await??;
        let size_bytes = deadline.run(session.screenshot()).await??;
        let latency = started_at.elapsed();

        debug!(
            session.id = %session.id(),
            fetch.size_bytes = size_bytes,
            fetch.latency = latency.as_millis(),
            "Captured rendered page."
        );

        Ok(FetchResult {
            url: run.descriptor.url.clone(),
            outcome: FetchOutcome::Rendered,
            size_bytes,
            latency,
            observed_at: OffsetDateTime::now_utc(),
        })
    }
}

impl Fetcher for PageFetcher {
    async fn fetch(
        &self,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> Result<FetchResult, FetchError> {
        let driver = WebDriver::new(&self.web_driver_url);
        let request = NewSessionRequest::new(
            &self.browser_name,
            self.headless,
            &identity_tag(&self.product, run),
        );
        let session = deadline.run(driver.new_session(&request)).await??;

        let result = self.capture(&session, run, deadline).await;

        // The session is released whatever the capture outcome is.
        let session_id = session.id().to_string();
        match timeout(self.teardown_grace, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(session.id = %session_id, "Failed to close WebDriver session: {err}")
            }
            Err(_) => warn!(
                session.id = %session_id,
                "WebDriver session was not closed within {}.",
                humantime::format_duration(self.teardown_grace)
            ),
        }

        result
    }
}
