// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn starts_unregistered_and_stopped() {
    let session = SessionHandle::new();
    assert_eq!(session.identity(), None);
    assert!(!session.is_running());
}

#[test]
fn identity_set_and_refreshed() {
    let session = SessionHandle::new();

    session.set_identity(ClientId(1));
    assert_eq!(session.identity(), Some(ClientId(1)));

    // A later heartbeat may replace the identity.
    session.set_identity(ClientId(2));
    assert_eq!(session.identity(), Some(ClientId(2)));
}

#[test]
fn running_flag_round_trip() {
    let session = SessionHandle::new();
    session.set_running(true);
    assert!(session.is_running());
    session.set_running(false);
    assert!(!session.is_running());
}

#[test]
fn handles_share_state() {
    let session = SessionHandle::new();
    let view = session.clone();
    session.set_identity(ClientId(9));
    assert_eq!(view.identity(), Some(ClientId(9)));
}
