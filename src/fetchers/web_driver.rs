mod new_session_request;
mod web_driver_response;
mod web_driver_session;

pub use self::{new_session_request::NewSessionRequest, web_driver_session::WebDriverSession};

use self::web_driver_response::{WebDriverErrorValue, WebDriverResponse};
use crate::fetchers::FetchError;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

/// Minimal client of the W3C WebDriver HTTP protocol.
#[derive(Clone)]
pub struct WebDriver {
    url: String,
    client: ClientWithMiddleware,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSessionValue {
    session_id: String,
}

impl WebDriver {
    /// Creates a client of the WebDriver server at `url`.
    pub fn new(url: &Url) -> Self {
        let url = url.as_str();
        Self {
            url: if url.ends_with('/') {
                url.to_string()
            } else {
                format!("{url}/")
            },
            client: ClientBuilder::new(reqwest::Client::new())
                .with(TracingMiddleware::<SpanBackendWithUrl>::new())
                .build(),
        }
    }

    /// Starts a new browser session. The session must be closed with [`WebDriverSession::close`].
    pub async fn new_session(
        &self,
        request: &NewSessionRequest,
    ) -> Result<WebDriverSession, FetchError> {
        let value: NewSessionValue = self
            .send(self.client.post(self.endpoint("session")).json(request))
            .await?;
        Ok(WebDriverSession::new(self.clone(), value.session_id))
    }

    /// Deletes the session with the specified id.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), FetchError> {
        self.send(
            self.client
                .delete(self.endpoint(&format!("session/{session_id}"))),
        )
        .await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error = response
                .json::<WebDriverResponse<WebDriverErrorValue>>()
                .await
                .map_err(|err| {
                    FetchError::Browser(format!(
                        "unexpected WebDriver response ({status}): {err}"
                    ))
                })?;
            return Err(FetchError::Browser(error.value.to_string()));
        }

        Ok(response.json::<WebDriverResponse<T>>().await?.value)
    }
}
