use crate::fetchers::{web_driver::WebDriver, FetchError};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// A browser session scoped to a single fetch. Sessions that are dropped without being closed,
/// e.g. when the fetch is cancelled, are deleted in the background.
pub struct WebDriverSession {
    driver: WebDriver,
    id: String,
    closed: bool,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct Screenshot(String);

impl WebDriverSession {
    pub(super) fn new(driver: WebDriver, id: String) -> Self {
        Self {
            driver,
            id,
            closed: false,
        }
    }

    /// ID of the session assigned by the WebDriver server.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Limits how long the browser waits for a page to load.
    pub async fn set_page_load_timeout(&self, timeout: Duration) -> Result<(), FetchError> {
        let request = self
            .driver
            .client
            .post(self.endpoint("timeouts"))
            .json(&json!({ "pageLoad": timeout.as_millis() as u64 }));
        self.driver.send(request).await
    }

    /// Navigates to `url` and waits for the page to load.
    pub async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        let request = self
            .driver
            .client
            .post(self.endpoint("url"))
            .json(&json!({ "url": url }));
        self.driver.send(request).await
    }

    /// Captures a snapshot of the current page and returns its decoded size in bytes.
    pub async fn screenshot(&self) -> Result<u64, FetchError> {
        let request = self.driver.client.get(self.endpoint("screenshot"));
        let Screenshot(encoded) = self.driver.send(request).await?;
        Ok(decoded_len(&encoded))
    }

    /// Deletes the session.
    pub async fn close(mut self) -> Result<(), FetchError> {
        self.driver.delete_session(&self.id).await?;
        self.closed = true;
        debug!(session.id = %self.id, "Closed WebDriver session.");
        Ok(())
    }

    fn endpoint(&self, command: &str) -> String {
        self.driver
            .endpoint(&format!("session/{}/{command}", self.id))
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!(
                session.id = %self.id,
                "Cannot delete WebDriver session: no runtime is available."
            );
            return;
        };

        let driver = self.driver.clone();
        let id = std::mem::take(&mut self.id);
        handle.spawn(async move {
            match driver.delete_session(&id).await {
                Ok(_) => debug!(session.id = %id, "Deleted abandoned WebDriver session."),
                Err(err) => warn!(
                    session.id = %id,
                    "Failed to delete abandoned WebDriver session: {err}"
                ),
            }
        });
    }
}

/// Size of the data encoded by a padded base64 string.
fn decoded_len(encoded: &str) -> u64 {
    let encoded = encoded.trim_end();
    let padding = encoded.bytes().rev().take_while(|byte| *byte == b'=').count();
    ((encoded.len() / 4 * 3).saturating_sub(padding)) as u64
}

#[cfg(test)]
mod tests {
    use super::decoded_len;
    use crate::fetchers::web_driver::{NewSessionRequest, WebDriver};
    use httpmock::MockServer;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    #[test]
    fn properly_calculates_decoded_size() {
        assert_eq!(decoded_len(""), 0);
        assert_eq!(decoded_len("aGVsbG8="), 5);
        assert_eq!(decoded_len("aGVsbA=="), 4);
        assert_eq!(decoded_len("aGVs"), 3);
    }

    #[tokio::test]
    async fn properly_drives_session() -> anyhow::Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/session");
            then.status(200)
                .json_body(json!({ "value": { "sessionId": "s1", "capabilities": {} } }));
        });
        let timeouts_mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/session/s1/timeouts")
                .json_body(json!({ "pageLoad": 750 }));
            then.status(200).json_body(json!({ "value": null }));
        });
        let url_mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/session/s1/url")
                .json_body(json!({ "url": "https://sfb.dev/" }));
            then.status(200).json_body(json!({ "value": null }));
        });
        let screenshot_mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/session/s1/screenshot");
            then.status(200).json_body(json!({ "value": "aGVsbG8=" }));
        });
        let delete_mock = server.mock(|when, then| {
            when.method(httpmock::Method::DELETE).path("/session/s1");
            then.status(200).json_body(json!({ "value": null }));
        });

        let driver = WebDriver::new(&Url::parse(&server.base_url())?);
        let session = driver
            .new_session(&NewSessionRequest::new("chrome", true, "SFB"))
            .await?;
        session
            .set_page_load_timeout(Duration::from_millis(750))
            .await?;
        session.navigate("https://sfb.dev/").await?;
        assert_eq!(session.screenshot().await?, 5);
        session.close().await?;

        timeouts_mock.assert();
        url_mock.assert();
        screenshot_mock.assert();
        delete_mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn deletes_dropped_sessions() -> anyhow::Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/session");
            then.status(200)
                .json_body(json!({ "value": { "sessionId": "s2", "capabilities": {} } }));
        });
        let delete_mock = server.mock(|when, then| {
            when.method(httpmock::Method::DELETE).path("/session/s2");
            then.status(200).json_body(json!({ "value": null }));
        });

        let driver = WebDriver::new(&Url::parse(&server.base_url())?);
        let session = driver
            .new_session(&NewSessionRequest::new("chrome", true, "SFB"))
            .await?;
        drop(session);

        for _ in 0..50 {
            if delete_mock.hits() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        delete_mock.assert();

        Ok(())
    }
}
