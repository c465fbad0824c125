// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use patrol_core::CommandKind;

#[test]
fn heartbeat_response_with_identity() {
    let json = r#"{"status": "ok", "client_id": 17}"#;
    let resp: HeartbeatResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.status, "ok");
    assert_eq!(resp.client_id, Some(ClientId(17)));
}

#[test]
fn heartbeat_response_without_identity() {
    let json = r#"{"status": "error"}"#;
    let resp: HeartbeatResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.client_id, None);
}

#[test]
fn pending_commands_default_to_empty() {
    let json = r#"{"status": "ok"}"#;
    let resp: PendingCommandsResponse = serde_json::from_str(json).unwrap();
    assert!(resp.commands.is_empty());
}

#[test]
fn command_entry_converts_to_command() {
    let json = r#"{
        "status": "ok",
        "commands": [
            {"id": 3, "command_type": "shell", "command_content": "uptime"}
        ]
    }"#;
    let resp: PendingCommandsResponse = serde_json::from_str(json).unwrap();
    let command: Command = resp.commands[0].clone().into();

    assert_eq!(command.id, CommandId(3));
    assert_eq!(CommandKind::parse(&command.kind), Some(CommandKind::Shell));
    assert_eq!(command.payload, "uptime");
}

#[test]
fn command_result_request_serializes_wire_fields() {
    let req = CommandResultRequest { status: "executed".into(), result: "done".into() };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["status"], "executed");
    assert_eq!(json["result"], "done");
}
