//! Streamwatch CLI entry point.
//!
//! With no arguments, runs the watchdog loop against the configuration at
//! the fixed default location. `check` and `test-alert` are one-shot helpers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use streamwatch::alert::build_sink;
use streamwatch::config::{load_config, WatchdogConfig, DEFAULT_CONFIG_PATH};
use streamwatch::http::build_client;
use streamwatch::logging::{self, LoggingGuard};
use streamwatch::status::youtube::YoutubeStatusSource;
use streamwatch::status::StatusSource;
use streamwatch::watchdog::{Threshold, Watchdog};

/// Streamwatch — alert when a YouTube broadcast stops being live.
#[derive(Parser)]
#[command(name = "streamwatch", version, about)]
struct Cli {
    /// Configuration file (`.json` or TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the watchdog loop until interrupted.
    Run,
    /// Perform one liveness check; exit 0 when live, 1 otherwise.
    Check,
    /// Send one alert through the configured backend.
    TestAlert,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let _logging_guard = init_logging(&config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => handle_run(&config).await,
        Command::Check => handle_check(&config).await,
        Command::TestAlert => handle_test_alert(&config).await,
    }
}

fn init_logging(config: &WatchdogConfig) -> anyhow::Result<Option<LoggingGuard>> {
    match &config.log_dir {
        Some(dir) => logging::init_with_file(dir).map(Some),
        None => {
            logging::init_console();
            Ok(None)
        }
    }
}

fn status_source(config: &WatchdogConfig, client: reqwest::Client) -> YoutubeStatusSource {
    YoutubeStatusSource::new(
        config.youtube_api_key.clone(),
        config.youtube_access_token.clone(),
        client,
    )
}

/// Run the watchdog loop.
async fn handle_run(config: &WatchdogConfig) -> anyhow::Result<ExitCode> {
    let client = build_client(config.http_timeout()).context("failed to build HTTP client")?;
    let source = status_source(config, client.clone());
    let sink = build_sink(config, client)?;
    let threshold = Threshold::from(config.threshold()?);

    info!(alert_method = %config.alert_method, "streamwatch starting");

    let mut watchdog = Watchdog::new(
        Box::new(source),
        sink,
        threshold,
        config.poll_interval(),
        config.alert_message.clone(),
    );
    watchdog.run().await;
    Ok(ExitCode::SUCCESS)
}

/// Perform a single liveness check and report it on stdout.
async fn handle_check(config: &WatchdogConfig) -> anyhow::Result<ExitCode> {
    let client = build_client(config.http_timeout()).context("failed to build HTTP client")?;
    let liveness = status_source(config, client).check().await;
    println!("{liveness}");
    if liveness.is_live() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Send one alert so the backend configuration can be verified.
async fn handle_test_alert(config: &WatchdogConfig) -> anyhow::Result<ExitCode> {
    let client = build_client(config.http_timeout()).context("failed to build HTTP client")?;
    let sink = build_sink(config, client)?;
    sink.send(&config.alert_message)
        .await
        .with_context(|| format!("{} alert failed", sink.name()))?;
    info!(backend = sink.name(), "test alert sent");
    Ok(ExitCode::SUCCESS)
}
