// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-update state machine: validate → back up → fetch → unpack →
//! verify → apply → watch.
//!
//! Every state before Applying fails closed: the running install is
//! untouched and the call reports failure. Once Applying completes, a
//! detached watchdog is armed that sleeps for the rollback timeout and
//! then restores the backup unconditionally; no health signal decides
//! whether to revert. The watchdog holds only the paths captured at
//! arm time, so it outlives the update call and a supervisor stop, and
//! it cannot be cancelled.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use tracing::{error, info};

use patrol_client::Fetcher;

use crate::error::DispatchError;

/// File whose presence marks an unpacked package as a valid release.
pub const ENTRY_POINT: &str = "patrold";

/// Paths and timing the engine operates with.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Directory holding the agent's own executable files.
    pub install_dir: PathBuf,
    /// Scratch area for the fetched package and its unpacked contents.
    pub staging_dir: PathBuf,
    /// Root under which backup snapshots are created.
    pub backup_root: PathBuf,
    /// How long the new version runs before the watchdog reverts it.
    pub rollback_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct UpdatePayload {
    url: Option<String>,
    version: Option<String>,
}

pub struct UpdateEngine<F: Fetcher> {
    fetcher: Arc<F>,
    config: UpdateConfig,
}

impl<F: Fetcher> UpdateEngine<F> {
    pub fn new(fetcher: Arc<F>, config: UpdateConfig) -> Self {
        Self { fetcher, config }
    }

    /// Run the whole update; returns the success result text.
    pub async fn run(&self, payload: &str) -> Result<String, DispatchError> {
        let (url, version) = validate(payload)?;

        let backup_dir = self.back_up()?;
        info!(backup = %backup_dir.display(), "install directory backed up");

        let applied = match self.stage_and_apply(&url, &version).await {
            Ok(applied) => applied,
            Err(e) => {
                // No partial package may stay behind; the backup
                // snapshot is not ours to clean.
                let _ = std::fs::remove_dir_all(&self.config.staging_dir);
                return Err(e);
            }
        };
        info!(applied, version = %version, "update applied");
        let _ = std::fs::remove_dir_all(&self.config.staging_dir);

        arm_rollback_watchdog(
            backup_dir,
            self.config.install_dir.clone(),
            self.config.rollback_timeout,
        );

        Ok(format!("update applied, version: {version}"))
    }

    async fn stage_and_apply(&self, url: &str, version: &str) -> Result<usize, DispatchError> {
        let archive = self.fetch(url, version).await?;
        self.unpack(&archive)?;
        self.verify()?;
        self.apply(&archive)
    }

    /// Backing-up: copy every regular file in the install dir into a
    /// fresh timestamp-keyed snapshot directory.
    fn back_up(&self) -> Result<PathBuf, DispatchError> {
        let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let backup_dir = self.config.backup_root.join(format!("backup_{stamp}"));
        std::fs::create_dir_all(&backup_dir)
            .map_err(|e| DispatchError::Execution(format!("failed to create backup dir: {e}")))?;
        copy_regular_files(&self.config.install_dir, &backup_dir)
            .map_err(|e| DispatchError::Execution(format!("backup failed: {e}")))?;
        Ok(backup_dir)
    }

    /// Fetching: retrieve the package archive into the staging dir.
    async fn fetch(&self, url: &str, version: &str) -> Result<PathBuf, DispatchError> {
        std::fs::create_dir_all(&self.config.staging_dir)?;
        let archive = self.config.staging_dir.join(format!("update_{version}.zip"));
        self.fetcher
            .fetch_to_file(url, &archive)
            .await
            .map_err(|e| DispatchError::Execution(format!("failed to fetch update package: {e}")))?;
        Ok(archive)
    }

    /// Unpacking: expand the archive next to itself in staging.
    fn unpack(&self, archive: &Path) -> Result<(), DispatchError> {
        let file = std::fs::File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| DispatchError::Execution(format!("failed to open update package: {e}")))?;
        zip.extract(&self.config.staging_dir)
            .map_err(|e| DispatchError::Execution(format!("failed to unpack update package: {e}")))?;
        Ok(())
    }

    /// Verifying: the unpacked set must contain the entry-point file.
    fn verify(&self) -> Result<(), DispatchError> {
        if self.config.staging_dir.join(ENTRY_POINT).is_file() {
            Ok(())
        } else {
            Err(DispatchError::Integrity(format!(
                "update package is missing {ENTRY_POINT}"
            )))
        }
    }

    /// Applying: copy every staged release file over the install dir.
    /// The only state that mutates the live install.
    fn apply(&self, archive: &Path) -> Result<usize, DispatchError> {
        let archive_name = archive.file_name().map(|n| n.to_os_string());
        let mut applied = 0;
        for entry in std::fs::read_dir(&self.config.staging_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // The downloaded archive sits in the same dir; it is not
            // part of the release set.
            if archive_name.as_deref() == Some(entry.file_name().as_os_str()) {
                continue;
            }
            let dest = self.config.install_dir.join(entry.file_name());
            std::fs::copy(entry.path(), &dest)
                .map_err(|e| DispatchError::Execution(format!("failed to apply update: {e}")))?;
            applied += 1;
        }
        Ok(applied)
    }
}

fn validate(payload: &str) -> Result<(String, String), DispatchError> {
    let parsed: UpdatePayload = serde_json::from_str(payload)
        .map_err(|e| DispatchError::Validation(format!("update payload is not valid JSON: {e}")))?;
    match (parsed.url, parsed.version) {
        (Some(url), Some(version)) => Ok((url, version)),
        _ => Err(DispatchError::Validation("update payload missing url or version".to_string())),
    }
}

/// Arm the detached rollback watchdog.
///
/// One-shot, not cancellable, owns nothing but the captured paths;
/// it keeps running even if the supervisor that triggered the update
/// has since stopped.
fn arm_rollback_watchdog(backup_dir: PathBuf, install_dir: PathBuf, timeout: Duration) {
    info!(
        timeout_secs = timeout.as_secs_f32(),
        backup = %backup_dir.display(),
        "rollback watchdog armed"
    );
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        match restore_snapshot(&backup_dir, &install_dir) {
            Ok(restored) => {
                info!(restored, backup = %backup_dir.display(), "rollback watchdog restored pre-update state");
            }
            Err(e) => error!(error = %e, "rollback failed"),
        }
    });
}

/// Restore the install dir to exactly the snapshot's file set: files
/// the update introduced are removed, everything else is copied back.
fn restore_snapshot(backup_dir: &Path, install_dir: &Path) -> std::io::Result<usize> {
    for entry in std::fs::read_dir(install_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && !backup_dir.join(entry.file_name()).is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    copy_regular_files(backup_dir, install_dir)
}

/// Copy every regular file from `src` into `dest`, returning the count.
fn copy_regular_files(src: &Path, dest: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::copy(entry.path(), dest.join(entry.file_name()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
