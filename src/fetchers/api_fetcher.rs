use crate::{
    fetchers::{identity_tag, FetchDeadline, FetchError, Fetcher},
    tasks::TaskRun,
};
use futures::StreamExt;
use http::header::USER_AGENT;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use sfb_types::measurements::{FetchOutcome, FetchResult};
use time::OffsetDateTime;
use tracing::debug;

/// Issues a plain `GET` against the run target.
#[derive(Debug, Clone)]
pub struct ApiFetcher {
    product: String,
}

impl ApiFetcher {
    /// Creates a fetcher that identifies itself as `product`.
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
        }
    }
}

impl Fetcher for ApiFetcher {
    async fn fetch(
        &self,
        run: &TaskRun,
        deadline: FetchDeadline,
    ) -> Result<FetchResult, FetchError> {
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(TracingMiddleware::<SpanBackendWithUrl>::new())
            .build();

        let response = deadline
            .run(
                client
                    .get(&run.descriptor.url)
                    .header(USER_AGENT, identity_tag(&self.product, run))
                    .send(),
            )
            .await??;
        let latency = deadline.elapsed();
        let observed_at = OffsetDateTime::now_utc();
        let status = response.status();
        let content_length = response.content_length();

        // Body is drained under the same deadline only to learn its size, latency is measured at
        // headers. A body that doesn't arrive in time doesn't fail the fetch.
        let mut size_bytes = 0u64;
        let mut stream = Box::pin(response.bytes_stream());
        let drained = loop {
            match deadline.run(stream.next()).await {
                Ok(Some(Ok(chunk))) => size_bytes += chunk.len() as u64,
                Ok(None) => break Ok(()),
                Ok(Some(Err(err))) => break Err(FetchError::from(err)),
                Err(err) => break Err(err),
            }
        };
        if let Err(err) = drained {
            debug!("Failed to read API response body: {err}");
            size_bytes = content_length.unwrap_or(size_bytes);
        }

        debug!(
            http.status_code = status.as_u16(),
            http.content_length = content_length,
            fetch.size_bytes = size_bytes,
            fetch.latency = latency.as_millis(),
            "Received API response."
        );

        Ok(FetchResult {
            url: run.descriptor.url.clone(),
            outcome: FetchOutcome::Status(status),
            size_bytes,
            latency,
            observed_at,
        })
    }
}
