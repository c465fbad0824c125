// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command dispatcher: the single entry point turning a remote
//! instruction into a local effect.
//!
//! `execute` never errors outward: every internal failure is rendered
//! into a `failed` outcome with a human-readable result, so each
//! dispatched command always yields a definite `(status, result)` pair.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use patrol_client::Fetcher;
use patrol_core::{CommandId, CommandKind, CommandOutcome};

use crate::shell::{self, ShellOutcome};
use crate::update::{UpdateConfig, UpdateEngine};
use crate::{fileop, AgentConfig};

/// How much of a result string makes it into the completion log line.
const RESULT_LOG_LIMIT: usize = 100;

pub struct Dispatcher<F: Fetcher> {
    fetcher: Arc<F>,
    command_timeout: Duration,
    update: UpdateEngine<F>,
}

impl<F: Fetcher> Dispatcher<F> {
    pub fn new(fetcher: Arc<F>, config: &AgentConfig) -> Self {
        let update = UpdateEngine::new(
            Arc::clone(&fetcher),
            UpdateConfig {
                install_dir: config.install_dir.clone(),
                staging_dir: config.staging_dir.clone(),
                backup_root: config.backup_dir.clone(),
                rollback_timeout: config.rollback_timeout,
            },
        );
        Self { fetcher, command_timeout: config.command_timeout, update }
    }

    /// Execute one command to its terminal outcome.
    pub async fn execute(&self, id: CommandId, kind: &str, payload: &str) -> CommandOutcome {
        info!(command = %id, kind, "executing command");

        let outcome = match CommandKind::parse(kind) {
            None => CommandOutcome::failed(format!("unknown command type: {kind}")),
            Some(CommandKind::Shell) => self.run_shell(payload).await,
            Some(CommandKind::FileOperation) => {
                match fileop::execute(self.fetcher.as_ref(), payload).await {
                    Ok(result) => CommandOutcome::executed(result),
                    Err(e) => CommandOutcome::failed(e.to_string()),
                }
            }
            Some(CommandKind::ScriptUpdate) => match self.update.run(payload).await {
                Ok(result) => CommandOutcome::executed(result),
                Err(e) => CommandOutcome::failed(e.to_string()),
            },
        };

        info!(
            command = %id,
            status = %outcome.status,
            result = truncate(&outcome.result, RESULT_LOG_LIMIT),
            "command finished"
        );
        outcome
    }

    async fn run_shell(&self, payload: &str) -> CommandOutcome {
        match shell::run_shell(payload, self.command_timeout).await {
            Ok(ShellOutcome::Completed { exit_code: 0, output }) => {
                CommandOutcome::executed(output)
            }
            Ok(ShellOutcome::Completed { exit_code, output }) => {
                CommandOutcome::executed(format!("command exited with code {exit_code}: {output}"))
            }
            Ok(ShellOutcome::TimedOut { timeout }) => {
                CommandOutcome::failed(format!("timed out after {}s", timeout.as_secs_f32()))
            }
            Err(e) => CommandOutcome::failed(e.to_string()),
        }
    }
}

/// Truncate to at most `limit` bytes on a char boundary.
fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
