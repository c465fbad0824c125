// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! patrol-core: shared types for the patrol endpoint agent.

pub mod command;
pub mod host;
pub mod id;
pub mod session;

pub use command::{Command, CommandKind, CommandOutcome, CommandStatus};
pub use host::{HostIdentity, HostSample};
pub use id::{ClientId, CommandId};
pub use session::{Session, SessionHandle};
