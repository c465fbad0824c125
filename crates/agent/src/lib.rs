// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! patrol-agent: supervisor, dispatcher, and update engine for the
//! patrol endpoint agent.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod capture;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod fileop;
pub mod host;
pub mod shell;
pub mod supervisor;
pub mod update;

pub use capture::{CaptureAdapter, CommandCapture, DisabledCapture};
pub use dispatch::Dispatcher;
pub use env::{AgentConfig, ConfigError};
pub use error::DispatchError;
pub use supervisor::Supervisor;
pub use update::{UpdateConfig, UpdateEngine, ENTRY_POINT};
