use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Envelope of every WebDriver response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebDriverResponse<T> {
    pub value: T,
}

/// Value of a WebDriver error response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebDriverErrorValue {
    /// Error code, e.g. `timeout` or `unknown error`.
    pub error: String,
    #[serde(default)]
    pub message: String,
}

impl Display for WebDriverErrorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{}: {}", self.error, self.message)
        }
    }
}
