use crate::sinks::MeasurementSink;
use anyhow::{anyhow, bail};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use serde::Serialize;
use sfb_types::measurements::MeasurementRecord;
use tracing::debug;
use url::Url;

/// Stream used when the task doesn't name one.
const DEFAULT_STREAM_NAME: &str = "sfb-measurements";

/// Posts records to the ingestion endpoint of a stream service.
#[derive(Clone)]
pub struct HttpSink {
    url: Url,
    client: ClientWithMiddleware,
}

/// Body of the `POST api/records` request.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PutRecordRequest<'a> {
    stream_name: &'a str,
    partition_key: &'a str,
    region: &'a str,
    data: &'a MeasurementRecord,
}

impl HttpSink {
    /// Creates a sink for the ingestion service at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: ClientBuilder::new(reqwest::Client::new())
                .with(TracingMiddleware::<SpanBackendWithUrl>::new())
                .build(),
        }
    }
}

impl MeasurementSink for HttpSink {
    async fn write(&self, record: &MeasurementRecord) -> anyhow::Result<()> {
        let request = PutRecordRequest {
            stream_name: record.task.kds.as_deref().unwrap_or(DEFAULT_STREAM_NAME),
            partition_key: record.partition_key(),
            region: &record.task.region,
            data: record,
        };

        let response = self
            .client
            .post(format!("{}api/records", self.url.as_str()))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                anyhow!(
                    "Could not connect to the measurement sink to write record ('{}'): {err:?}",
                    record.id
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "Measurement sink rejected record ('{}') ({status}): {}",
                record.id,
                response.text().await?
            );
        }

        debug!(
            record.id = %record.id,
            http.status_code = status.as_u16(),
            "Successfully wrote measurement record."
        );

        Ok(())
    }
}
