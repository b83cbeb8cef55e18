#![deny(warnings)]

mod api;
mod config;
mod error;
mod fetchers;
mod intake;
mod scheduler;
mod sinks;
mod tasks;

use crate::{
    api::Api,
    config::Config,
    fetchers::TaskFetcher,
    intake::{EnvIntake, EventIntake, TaskIntake},
    sinks::ConfiguredSink,
};
use anyhow::{anyhow, bail};
use clap::{crate_authors, crate_description, crate_version, Arg, ArgMatches, Command};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().flatten_event(true).init();
    } else {
        tracing_subscriber::fmt::init();
    }

    // Install default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install default RusTLS crypto provider.");

    let matches = command().get_matches();

    let config = Config::read_from_file(
        matches
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("<CONFIG> argument is not provided."))?,
    )?;

    let api = Api::new(
        config.clone(),
        TaskFetcher::new(&config),
        ConfiguredSink::new(&config.components),
    );

    info!(config = ?api.config, "SFB worker configuration.");

    let processed = api.tasks().process_all(select_intake(&matches)?.as_ref()).await?;

    info!(tasks.processed = processed, "Task processing finished.");

    Ok(())
}

fn command() -> Command {
    Command::new("SFB load generation worker.")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("CONFIG")
                .env("SFB_CONFIG")
                .short('c')
                .long("config")
                .default_value("sfb.toml")
                .help("Path to the SFB worker configuration file."),
        )
        .arg(
            Arg::new("TASK")
                .env("TASK")
                .long("task")
                .help("JSON payload of the task to run."),
        )
        .arg(
            Arg::new("EVENT")
                .short('e')
                .long("event")
                .help("Path to the notification event with tasks to run, `-` to read from stdin."),
        )
}

/// Selects where tasks come from. An explicit `--event` takes precedence over a task from the
/// environment.
fn select_intake(matches: &ArgMatches) -> anyhow::Result<Box<dyn TaskIntake>> {
    match (
        matches.get_one::<String>("EVENT"),
        matches.get_one::<String>("TASK"),
    ) {
        (Some(event_path), _) => Ok(Box::new(EventIntake::read_from(event_path)?)),
        (None, Some(task)) => Ok(Box::new(EnvIntake::new(task.as_str()))),
        (None, None) => bail!("Either <TASK> or <EVENT> argument must be provided."),
    }
}
