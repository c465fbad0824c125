// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor: owns the session and the four worker loops.
//!
//! Workers are peers on independent cadences; none blocks another. The
//! heartbeat worker is the only one that runs before an identity is
//! assigned, because heartbeating is how identity gets assigned in the
//! first place. Telemetry, screenshots, and command polling all check
//! the session each cycle and idle until it carries an identity.
//!
//! Worker errors are logged and swallowed: a failed cycle never stops
//! a loop, only `stop()` does.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use patrol_client::{ControlPlane, Fetcher};
use patrol_core::{HostIdentity, SessionHandle};

use crate::capture::CaptureAdapter;
use crate::dispatch::Dispatcher;
use crate::{host, AgentConfig};

/// How long `stop()` waits for a worker to notice the flag before
/// aborting it.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Supervisor<C: ControlPlane + Fetcher> {
    session: SessionHandle,
    client: Arc<C>,
    capture: Arc<dyn CaptureAdapter>,
    dispatcher: Arc<Dispatcher<C>>,
    config: AgentConfig,
    workers: Vec<(&'static str, JoinHandle<()>)>,
}

impl<C: ControlPlane + Fetcher> Supervisor<C> {
    pub fn new(client: Arc<C>, capture: Arc<dyn CaptureAdapter>, config: AgentConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&client), &config));
        Self {
            session: SessionHandle::new(),
            client,
            capture,
            dispatcher,
            config,
            workers: Vec::new(),
        }
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Spawn all worker loops. Idempotence is not supported; call once.
    pub fn start(&mut self) {
        let identity = host::resolve_identity();
        info!(hostname = %identity.hostname, ip = %identity.ip_address, "starting workers");
        self.session.set_running(true);

        self.workers = vec![
            ("heartbeat", self.spawn_heartbeat(identity)),
            ("telemetry", self.spawn_telemetry()),
            ("screenshot", self.spawn_screenshot()),
            ("command-poll", self.spawn_command_poll()),
        ];
    }

    /// Clear the running flag and wait for the loops to wind down.
    ///
    /// A worker mid-sleep or mid-command gets [`JOIN_TIMEOUT`] to
    /// notice the flag, then is aborted.
    pub async fn stop(&mut self) {
        self.session.set_running(false);
        for (name, mut handle) in self.workers.drain(..) {
            if tokio::time::timeout(JOIN_TIMEOUT, &mut handle).await.is_err() {
                warn!(worker = name, "worker did not stop in time, aborting");
                handle.abort();
            }
        }
        info!("all workers stopped");
    }

    fn spawn_heartbeat(&self, identity: HostIdentity) -> JoinHandle<()> {
        let session = self.session.clone();
        let client = Arc::clone(&self.client);
        let interval = self.config.heartbeat_interval;
        tokio::spawn(async move {
            while session.is_running() {
                match client.heartbeat(&identity).await {
                    Ok(id) => session.set_identity(id),
                    Err(e) => warn!(error = %e, "heartbeat failed"),
                }
                tokio::time::sleep(interval).await;
            }
        })
    }

    fn spawn_telemetry(&self) -> JoinHandle<()> {
        let session = self.session.clone();
        let client = Arc::clone(&self.client);
        let interval = self.config.monitor_interval;
        tokio::spawn(async move {
            while session.is_running() {
                if let Some(id) = session.identity() {
                    let sample = host::sample().await;
                    if let Err(e) = client.upload_telemetry(id, &sample).await {
                        warn!(error = %e, "telemetry upload failed");
                    }
                }
                tokio::time::sleep(interval).await;
            }
        })
    }

    fn spawn_screenshot(&self) -> JoinHandle<()> {
        let session = self.session.clone();
        let client = Arc::clone(&self.client);
        let capture = Arc::clone(&self.capture);
        let interval = self.config.screenshot_interval;
        tokio::spawn(async move {
            while session.is_running() {
                if let Some(id) = session.identity() {
                    match capture.capture().await {
                        Ok(Some(image)) => {
                            if let Err(e) = client.upload_screenshot(id, image).await {
                                warn!(error = %e, "screenshot upload failed");
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "screen capture failed"),
                    }
                }
                tokio::time::sleep(interval).await;
            }
        })
    }

    fn spawn_command_poll(&self) -> JoinHandle<()> {
        let session = self.session.clone();
        let client = Arc::clone(&self.client);
        let dispatcher = Arc::clone(&self.dispatcher);
        let interval = self.config.command_poll_interval;
        tokio::spawn(async move {
            while session.is_running() {
                if let Some(id) = session.identity() {
                    match client.pending_commands(id).await {
                        Ok(commands) => {
                            for command in commands {
                                let outcome = dispatcher
                                    .execute(command.id, &command.kind, &command.payload)
                                    .await;
                                if let Err(e) = client.report_result(command.id, &outcome).await {
                                    // The outcome is lost; the control
                                    // plane will see the command as
                                    // never completed.
                                    warn!(command = %command.id, error = %e, "result report failed");
                                }
                            }
                        }
                        Err(e) => warn!(error = %e, "command poll failed"),
                    }
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
