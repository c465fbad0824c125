// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! patrold: the patrol endpoint agent daemon.
//!
//! Starts the supervisor's worker loops and runs until SIGINT, then
//! winds the workers down cleanly. Any armed rollback watchdog dies
//! with the process; the control plane can re-issue the update.

use std::sync::Arc;

use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use patrol_agent::{
    AgentConfig, CaptureAdapter, CommandCapture, DisabledCapture, Supervisor,
};
use patrol_client::ApiClient;

/// Log to stdout and a daily-rolling file under the configured log dir.
/// The guard must stay alive for the whole process or buffered lines
/// are dropped.
fn init_logging(config: &AgentConfig) -> WorkerGuard {
    let file = tracing_appender::rolling::daily(&config.log_dir, "patrold.log");
    let (file, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env("PATROL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(file.and(std::io::stdout))
        .init();
    guard
}

#[tokio::main]
async fn main() {
    let config = match AgentConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("patrold: {e}");
            std::process::exit(1);
        }
    };
    let _log_guard = init_logging(&config);
    info!(server = %config.server_url, "patrold starting");

    let client = match ApiClient::new(&config.server_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "failed to build API client");
            std::process::exit(1);
        }
    };

    let capture: Arc<dyn CaptureAdapter> = match &config.capture_command {
        Some(command) => Arc::new(CommandCapture::new(
            command.clone(),
            config.screenshot_max_bytes,
        )),
        None => Arc::new(DisabledCapture),
    };

    let mut supervisor = Supervisor::new(client, capture, config);
    supervisor.start();

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => error!(error = %e, "failed to listen for interrupt, shutting down"),
    }
    supervisor.stop().await;
    info!("patrold stopped");
}
