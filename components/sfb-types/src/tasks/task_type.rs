use serde::{Deserialize, Serialize};

/// Defines which kind of fetch a task performs against its target.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum TaskType {
    /// Single HTTP GET request per fetch.
    #[default]
    #[serde(rename = "API")]
    Api,
    /// Page load rendered by a headless browser per fetch.
    #[serde(rename = "RENDERED_PAGE", alias = "HTML")]
    RenderedPage,
}

impl TaskType {
    /// Returns the type tag of the task.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TaskType::Api => "api",
            TaskType::RenderedPage => "rendered_page",
        }
    }
}
