// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the control-plane API.
//!
//! Every response carries a `status` envelope field; anything other
//! than `"ok"` is treated as an endpoint failure by the client.

use serde::{Deserialize, Serialize};

use patrol_core::{ClientId, Command, CommandId};

/// Body of `POST /api/heartbeat`.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatRequest {
    pub hostname: String,
    pub ip_address: String,
    pub port: u16,
}

/// Reply to a heartbeat; `client_id` is the assigned identity.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatResponse {
    pub status: String,
    pub client_id: Option<ClientId>,
}

/// Body of `POST /api/system_data`.
#[derive(Debug, Clone, Serialize)]
pub struct SystemDataRequest {
    pub client_id: ClientId,
    pub cpu_usage: f32,
    pub memory_usage: f32,
    pub disk_usage: f32,
}

/// Bare acknowledgement envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub status: String,
}

/// Reply to `GET /api/commands/pending/<client_id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingCommandsResponse {
    pub status: String,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

/// One queued command as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEntry {
    pub id: CommandId,
    pub command_type: String,
    pub command_content: String,
}

impl From<CommandEntry> for Command {
    fn from(entry: CommandEntry) -> Self {
        Command {
            id: entry.id,
            kind: entry.command_type,
            payload: entry.command_content,
        }
    }
}

/// Body of `POST /api/commands/result/<command_id>`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResultRequest {
    pub status: String,
    pub result: String,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
