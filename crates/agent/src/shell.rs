// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command execution with a hard timeout.
//!
//! The command runs under `sh -c` in its own process group so that a
//! timeout can SIGKILL the whole tree; no child outlives the call.

use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::error::DispatchError;

/// How one shell invocation ended.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellOutcome {
    /// The command ran to completion (any exit code). `output` is the
    /// combined stdout+stderr, trimmed.
    Completed { exit_code: i32, output: String },
    /// The command was killed after exceeding the timeout.
    TimedOut { timeout: Duration },
}

/// Run `command` under `sh -c`, capturing combined output.
pub async fn run_shell(command: &str, timeout: Duration) -> Result<ShellOutcome, DispatchError> {
    debug!(command, timeout_secs = timeout.as_secs_f32(), "running shell command");

    let mut process = tokio::process::Command::new("sh");
    process
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let mut child = process
        .spawn()
        .map_err(|e| DispatchError::Execution(format!("failed to spawn shell: {e}")))?;

    // The child leads its own group, so its pid doubles as the pgid.
    let pgid = child.id().map(|pid| Pid::from_raw(pid as i32));

    // Drain pipes concurrently so a chatty command can't deadlock on a
    // full pipe while we wait for it to exit.
    let stdout_task = tokio::spawn(read_to_end(child.stdout.take()));
    let stderr_task = tokio::spawn(read_to_end(child.stderr.take()));

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => {
            let status = status
                .map_err(|e| DispatchError::Execution(format!("failed to wait on shell: {e}")))?;
            let mut combined = stdout_task.await.unwrap_or_default();
            combined.extend(stderr_task.await.unwrap_or_default());
            let output = String::from_utf8_lossy(&combined).trim().to_string();
            Ok(ShellOutcome::Completed { exit_code: status.code().unwrap_or(-1), output })
        }
        Err(_) => {
            if let Some(pgid) = pgid {
                if let Err(e) = killpg(pgid, Signal::SIGKILL) {
                    warn!(error = %e, "failed to kill timed-out process group");
                }
            }
            // Reap the leader so nothing is left as a zombie.
            let _ = child.wait().await;
            stdout_task.abort();
            stderr_task.abort();
            Ok(ShellOutcome::TimedOut { timeout })
        }
    }
}

async fn read_to_end<R: AsyncRead + Unpin>(reader: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        let _ = reader.read_to_end(&mut buf).await;
    }
    buf
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
