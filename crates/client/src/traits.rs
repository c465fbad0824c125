// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary traits the agent core is written against.
//!
//! Production code uses [`crate::ApiClient`] for both; tests substitute
//! fakes so the supervisor and update engine run without a network.

use std::path::Path;

use async_trait::async_trait;

use patrol_core::{ClientId, Command, CommandId, CommandOutcome, HostIdentity, HostSample};

use crate::api::ClientError;

/// Request/response surface of the control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync + 'static {
    /// Report liveness; returns the identity assigned by the control plane.
    async fn heartbeat(&self, host: &HostIdentity) -> Result<ClientId, ClientError>;

    /// Upload one telemetry sample. Best effort; never retried.
    async fn upload_telemetry(&self, id: ClientId, sample: &HostSample)
        -> Result<(), ClientError>;

    /// Upload one screen capture as a binary attachment. Best effort.
    async fn upload_screenshot(&self, id: ClientId, image: Vec<u8>) -> Result<(), ClientError>;

    /// Fetch queued commands, in execution order. Empty is normal.
    async fn pending_commands(&self, id: ClientId) -> Result<Vec<Command>, ClientError>;

    /// Report a command's terminal outcome. Lost if this call fails.
    async fn report_result(
        &self,
        id: CommandId,
        outcome: &CommandOutcome,
    ) -> Result<(), ClientError>;
}

/// Generic "retrieve bytes from a URL to a local path" primitive.
///
/// Used by file-operation downloads and the update engine's package
/// fetch.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), ClientError>;
}
