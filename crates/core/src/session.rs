// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live session state shared across the supervisor's workers.
//!
//! The session holds the agent's control-plane identity and the running
//! flag that drives every worker loop. Ownership discipline: the
//! supervisor flips `running`; the heartbeat worker is the only writer
//! of `identity`. All other workers read a snapshot per cycle.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::id::ClientId;

/// The agent's live identity and lifecycle flag.
#[derive(Debug, Default)]
pub struct Session {
    /// Identity assigned by the control plane; absent until the first
    /// successful heartbeat. Later heartbeats may refresh it.
    pub identity: Option<ClientId>,
    /// Drives all worker loops.
    pub running: bool,
}

/// Cloneable handle to the session behind its synchronization boundary.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the assigned identity, if any.
    pub fn identity(&self) -> Option<ClientId> {
        self.inner.lock().identity
    }

    /// Record an identity from a successful heartbeat.
    ///
    /// Heartbeat worker only; no other worker may call this.
    pub fn set_identity(&self, id: ClientId) {
        self.inner.lock().identity = Some(id);
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().running
    }

    pub fn set_running(&self, running: bool) {
        self.inner.lock().running = running;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
