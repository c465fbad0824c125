// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host records reported to the control plane.

use serde::{Deserialize, Serialize};

/// What the agent reports about itself on every heartbeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    pub hostname: String,
    pub ip_address: String,
    pub port: u16,
}

/// One telemetry sample; percentages in the 0–100 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostSample {
    pub cpu_usage: f32,
    pub memory_usage: f32,
    pub disk_usage: f32,
}
