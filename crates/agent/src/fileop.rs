// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File operations driven by the control plane.
//!
//! The payload is a JSON document declaring an operation type and its
//! fields. Each sub-type validates its required fields before touching
//! the filesystem; a missing field yields a failure result with nothing
//! mutated. Wire type names are server-relative: `upload` fetches a
//! remote resource to a local path, `download` would push a local file
//! to the server and is acknowledged but not implemented.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use patrol_client::Fetcher;

use crate::error::DispatchError;

#[derive(Debug, Deserialize)]
struct FileOpPayload {
    #[serde(rename = "type")]
    op: Option<String>,
    path: Option<String>,
    url: Option<String>,
    dest_path: Option<String>,
    permission: Option<String>,
}

/// Execute one file operation, returning the human-readable result.
pub async fn execute<F: Fetcher>(fetcher: &F, payload: &str) -> Result<String, DispatchError> {
    let op: FileOpPayload = serde_json::from_str(payload)
        .map_err(|e| DispatchError::Validation(format!("file operation payload is not valid JSON: {e}")))?;

    let (Some(kind), Some(path)) = (op.op, op.path) else {
        return Err(DispatchError::Validation(
            "file operation missing type or path".to_string(),
        ));
    };

    match kind.as_str() {
        "upload" => {
            let url = op.url.ok_or_else(|| {
                DispatchError::Validation("fetch operation missing url".to_string())
            })?;
            fetcher
                .fetch_to_file(&url, Path::new(&path))
                .await
                .map_err(|e| DispatchError::Execution(format!("fetch failed: {e}")))?;
            info!(url, path, "fetched remote resource");
            Ok(format!("fetched {url} to {path}"))
        }
        "download" => {
            // Push-to-remote is a structurally valid request we
            // deliberately do not implement.
            Ok("file push to server not implemented".to_string())
        }
        "copy" => {
            let dest = op.dest_path.ok_or_else(|| {
                DispatchError::Validation("copy operation missing dest_path".to_string())
            })?;
            std::fs::copy(&path, &dest)
                .map_err(|e| DispatchError::Execution(format!("copy failed: {e}")))?;
            info!(src = %path, dest = %dest, "copied file");
            Ok(format!("copied {path} to {dest}"))
        }
        "chmod" => {
            let permission = op.permission.ok_or_else(|| {
                DispatchError::Validation("chmod operation missing permission".to_string())
            })?;
            let mode = u32::from_str_radix(&permission, 8).map_err(|_| {
                DispatchError::Validation(format!("invalid octal permission: {permission}"))
            })?;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| DispatchError::Execution(format!("chmod failed: {e}")))?;
            info!(path = %path, mode = %permission, "changed permissions");
            Ok(format!("permissions on {path} set to {permission}"))
        }
        other => Err(DispatchError::Validation(format!("unknown file operation type: {other}"))),
    }
}

#[cfg(test)]
#[path = "fileop_tests.rs"]
mod tests;
