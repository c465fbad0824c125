// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for command execution.
//!
//! Every variant is local to the dispatcher boundary: it is rendered
//! into a `failed` result string there and never escapes to a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Missing or malformed command payload fields. No side effects
    /// were attempted.
    #[error("{0}")]
    Validation(String),
    /// The underlying operation (shell call, filesystem op, network
    /// fetch) failed.
    #[error("{0}")]
    Execution(String),
    /// A fetched update package failed the entry-point check.
    #[error("{0}")]
    Integrity(String),
}

impl From<std::io::Error> for DispatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Execution(e.to_string())
    }
}
