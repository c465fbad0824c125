// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command records issued by the control plane.
//!
//! A command arrives with a string-typed kind and an opaque payload whose
//! shape depends on the kind. The kind string is mapped onto a closed enum;
//! anything unrecognized falls through to the dispatcher's standard
//! failure result rather than being modeled as a variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::CommandId;

/// A unit of work queued by the control plane, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    /// Raw kind string as received on the wire.
    pub kind: String,
    /// Opaque payload; shell text or a JSON document depending on kind.
    pub payload: String,
}

/// The closed set of command kinds the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Shell,
    ScriptUpdate,
    FileOperation,
}

impl CommandKind {
    /// Map a wire kind string onto the closed enum.
    ///
    /// Returns `None` for unrecognized kinds; the dispatcher renders
    /// those into its standard failure result.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "shell" => Some(Self::Shell),
            "script_update" => Some(Self::ScriptUpdate),
            "file_operation" => Some(Self::FileOperation),
            _ => None,
        }
    }
}

/// Terminal status of an executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Executed,
    Failed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executed => "executed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The definite `(status, result)` pair every dispatched command yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    pub result: String,
}

impl CommandOutcome {
    pub fn executed(result: impl Into<String>) -> Self {
        Self { status: CommandStatus::Executed, result: result.into() }
    }

    pub fn failed(result: impl Into<String>) -> Self {
        Self { status: CommandStatus::Failed, result: result.into() }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
