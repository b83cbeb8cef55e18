use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Configuration for the API and rendered page fetchers.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Product token that starts the identity tag sent with every fetch.
    pub product: String,
    /// Browser requested from the WebDriver endpoint.
    pub browser_name: String,
    /// Indicates whether the browser should run without a visible window.
    pub headless: bool,
    /// Extra time given to a fetch past its deadline to release its resources (browser session
    /// teardown) before the fetch is abandoned.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub teardown_grace: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            product: "SFB".to_string(),
            browser_name: "chrome".to_string(),
            headless: true,
            teardown_grace: Duration::from_secs(5),
        }
    }
}
