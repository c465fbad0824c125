// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the agent.
//!
//! Every knob has a sane default; nothing is required except a
//! resolvable home directory for state paths.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot resolve state directory: HOME is not set")]
    NoStateDir,
    #[error("cannot resolve install directory: {0}")]
    NoInstallDir(std::io::Error),
}

/// Resolve state directory: PATROL_STATE_DIR > XDG_STATE_HOME/patrol > ~/.local/state/patrol
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("PATROL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("patrol"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/patrol"))
}

fn env_secs(name: &str, default_secs: u64) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(default_secs))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Runtime configuration for the agent process.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Control plane base URL.
    pub server_url: String,
    /// Liveness report interval.
    pub heartbeat_interval: Duration,
    /// Telemetry sampling interval.
    pub monitor_interval: Duration,
    /// Screen capture interval.
    pub screenshot_interval: Duration,
    /// Command queue poll interval.
    pub command_poll_interval: Duration,
    /// Hard timeout for one shell command.
    pub command_timeout: Duration,
    /// How long an applied update runs before the watchdog reverts it.
    pub rollback_timeout: Duration,
    /// Scratch area for fetched update packages.
    pub staging_dir: PathBuf,
    /// Root under which backup snapshots are created.
    pub backup_dir: PathBuf,
    /// Directory holding the agent's own executable files.
    pub install_dir: PathBuf,
    /// External command producing an image on stdout; unset disables
    /// screen capture.
    pub capture_command: Option<String>,
    /// Upper bound on one capture's size.
    pub screenshot_max_bytes: usize,
    /// Directory for the rolling agent log.
    pub log_dir: PathBuf,
}

impl AgentConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;

        let install_dir = match env_path("PATROL_INSTALL_DIR") {
            Some(dir) => dir,
            None => std::env::current_exe()
                .and_then(|exe| {
                    exe.parent().map(PathBuf::from).ok_or_else(|| {
                        std::io::Error::other("executable has no parent directory")
                    })
                })
                .map_err(ConfigError::NoInstallDir)?,
        };

        Ok(Self {
            server_url: std::env::var("PATROL_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            heartbeat_interval: env_secs("PATROL_HEARTBEAT_INTERVAL_SECS", 10),
            monitor_interval: env_secs("PATROL_MONITOR_INTERVAL_SECS", 30),
            screenshot_interval: env_secs("PATROL_SCREENSHOT_INTERVAL_SECS", 30),
            command_poll_interval: env_secs("PATROL_COMMAND_POLL_INTERVAL_SECS", 5),
            command_timeout: env_secs("PATROL_COMMAND_TIMEOUT_SECS", 60),
            rollback_timeout: env_secs("PATROL_ROLLBACK_TIMEOUT_SECS", 300),
            staging_dir: env_path("PATROL_STAGING_DIR")
                .unwrap_or_else(|| state_dir.join("update-staging")),
            backup_dir: env_path("PATROL_BACKUP_DIR")
                .unwrap_or_else(|| state_dir.join("backups")),
            install_dir,
            capture_command: std::env::var("PATROL_CAPTURE_COMMAND")
                .ok()
                .filter(|s| !s.is_empty()),
            screenshot_max_bytes: std::env::var("PATROL_SCREENSHOT_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(2 * 1024 * 1024),
            log_dir: env_path("PATROL_LOG_DIR").unwrap_or_else(|| state_dir.join("logs")),
        })
    }
}
