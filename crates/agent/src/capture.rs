// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Screen capture boundary.
//!
//! The capture backend and image codec stay external collaborators: the
//! agent only needs "bytes in, size-bounded". [`CommandCapture`] runs a
//! user-configured command that writes an encoded image to stdout;
//! [`DisabledCapture`] turns the screenshot worker into a no-op on
//! hosts with no display.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Hard bound on one capture invocation. A hung capture command must
/// not wedge the screenshot worker's loop.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to spawn capture command: {0}")]
    Spawn(std::io::Error),
    #[error("capture command exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    #[error("capture produced {size} bytes, above the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("capture command timed out after {}s", .timeout.as_secs_f32())]
    TimedOut { timeout: Duration },
}

/// One frame per call; `Ok(None)` means "nothing to upload this cycle".
#[async_trait]
pub trait CaptureAdapter: Send + Sync + 'static {
    async fn capture(&self) -> Result<Option<Vec<u8>>, CaptureError>;
}

/// Runs an external command and takes its stdout as the image bytes.
pub struct CommandCapture {
    command: String,
    max_bytes: usize,
    timeout: Duration,
}

impl CommandCapture {
    pub fn new(command: String, max_bytes: usize) -> Self {
        Self { command, max_bytes, timeout: CAPTURE_TIMEOUT }
    }
}

#[async_trait]
impl CaptureAdapter for CommandCapture {
    async fn capture(&self) -> Result<Option<Vec<u8>>, CaptureError> {
        let mut command = tokio::process::Command::new("sh");
        command
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reaps the child when the timeout drops the output future.
            .kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => output.map_err(CaptureError::Spawn)?,
            Err(_) => return Err(CaptureError::TimedOut { timeout: self.timeout }),
        };

        if !output.status.success() {
            return Err(CaptureError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Ok(None);
        }
        if output.stdout.len() > self.max_bytes {
            return Err(CaptureError::TooLarge {
                size: output.stdout.len(),
                max: self.max_bytes,
            });
        }
        debug!(bytes = output.stdout.len(), "captured frame");
        Ok(Some(output.stdout))
    }
}

/// Capture backend for headless hosts; every cycle is a no-op.
pub struct DisabledCapture;

#[async_trait]
impl CaptureAdapter for DisabledCapture {
    async fn capture(&self) -> Result<Option<Vec<u8>>, CaptureError> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
