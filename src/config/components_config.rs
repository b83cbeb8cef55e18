use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the components the worker talks to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ComponentsConfig {
    /// The URL of the WebDriver endpoint that drives the headless browser.
    pub web_driver_url: Url,
    /// The URL of the measurement ingestion endpoint. Records are logged when not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink_url: Option<Url>,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            web_driver_url: Url::parse("http://localhost:9515")
                .expect("Cannot parse WebDriver URL parameter."),
            sink_url: None,
        }
    }
}
