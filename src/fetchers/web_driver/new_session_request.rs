use serde::Serialize;

/// Body of the `POST /session` request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewSessionRequest {
    capabilities: Capabilities,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct Capabilities {
    always_match: BrowserCapabilities,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct BrowserCapabilities {
    browser_name: String,
    #[serde(rename = "goog:chromeOptions")]
    chrome_options: ChromeOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
struct ChromeOptions {
    args: Vec<String>,
}

impl NewSessionRequest {
    /// Requests a `browser_name` session that sends `user_agent` with every request.
    pub fn new(browser_name: &str, headless: bool, user_agent: &str) -> Self {
        let mut args = Vec::with_capacity(2);
        if headless {
            args.push("--headless=new".to_string());
        }
        args.push(format!("--user-agent={user_agent}"));

        Self {
            capabilities: Capabilities {
                always_match: BrowserCapabilities {
                    browser_name: browser_name.to_string(),
                    chrome_options: ChromeOptions { args },
                },
            },
        }
    }
}
