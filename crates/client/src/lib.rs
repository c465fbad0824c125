// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! patrol-client: HTTP boundary to the control plane.
//!
//! Exposes the [`ControlPlane`] and [`Fetcher`] seams the agent core is
//! written against, plus the production [`ApiClient`] over reqwest.

pub mod api;
pub mod protocol;
pub mod traits;

pub use api::{ApiClient, ClientError};
pub use traits::{ControlPlane, Fetcher};
