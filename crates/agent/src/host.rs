// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host identity resolution and telemetry sampling.

use patrol_core::{HostIdentity, HostSample};

/// Resolve what this agent reports about itself on heartbeats.
///
/// Falls back to `"unknown"` / loopback when the host gives us nothing;
/// a heartbeat with a degraded identity beats no heartbeat at all.
pub fn resolve_identity() -> HostIdentity {
    let hostname = sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string());
    let ip_address = local_address().unwrap_or_else(|| "127.0.0.1".to_string());
    HostIdentity { hostname, ip_address, port: 0 }
}

/// Local address as seen on the default route. The datagram is never
/// sent; connect() just forces the kernel to pick a source address.
fn local_address() -> Option<String> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

/// Take one CPU/memory/disk sample, percentages in 0–100.
///
/// CPU usage needs two refreshes a short interval apart; the sleep in
/// between is why this is async.
pub async fn sample() -> HostSample {
    let mut sys = sysinfo::System::new();

    sys.refresh_cpu_usage();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    sys.refresh_cpu_usage();
    let cpu_usage = sys.global_cpu_usage();

    sys.refresh_memory();
    let total_mem = sys.total_memory();
    let memory_usage = if total_mem == 0 {
        0.0
    } else {
        sys.used_memory() as f32 / total_mem as f32 * 100.0
    };

    let disks = sysinfo::Disks::new_with_refreshed_list();
    let (total, available) = disks
        .iter()
        .fold((0u64, 0u64), |(t, a), d| (t + d.total_space(), a + d.available_space()));
    let disk_usage =
        if total == 0 { 0.0 } else { (total - available) as f32 / total as f32 * 100.0 };

    HostSample { cpu_usage, memory_usage, disk_usage }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
