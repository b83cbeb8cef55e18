mod components_config;
mod fetch_config;
mod scheduler_config;

use figment::{providers, providers::Format, Figment};
use serde::{Deserialize, Serialize};

pub use self::{
    components_config::ComponentsConfig, fetch_config::FetchConfig,
    scheduler_config::SchedulerConfig,
};

/// Main worker config.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Configuration for the components that are deployed separately.
    pub components: ComponentsConfig,
    /// Configuration for the start gate and the paced loop.
    pub scheduler: SchedulerConfig,
    /// Configuration for the fetchers.
    pub fetch: FetchConfig,
}

impl Config {
    /// Reads the configuration from the file (TOML) and merges it with the default values and
    /// `SFB_` prefixed environment variables.
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(
            Figment::from(providers::Serialized::defaults(Self::default()))
                .merge(providers::Toml::file(path))
                .merge(providers::Env::prefixed("SFB_").split("__"))
                .extract()?,
        )
    }
}
