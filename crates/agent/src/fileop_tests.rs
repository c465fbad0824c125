// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use std::path::PathBuf;

use async_trait::async_trait;
use patrol_client::ClientError;

/// Fetcher that copies a local fixture instead of touching the network.
struct LocalFetcher {
    src: PathBuf,
}

#[async_trait]
impl Fetcher for LocalFetcher {
    async fn fetch_to_file(&self, _url: &str, dest: &std::path::Path) -> Result<(), ClientError> {
        tokio::fs::copy(&self.src, dest).await?;
        Ok(())
    }
}

fn run<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(fut)
}

#[yare::parameterized(
    empty_object     = { r#"{}"#, "missing type or path" },
    no_path          = { r#"{"type": "copy"}"#, "missing type or path" },
    no_type          = { r#"{"path": "/tmp/x"}"#, "missing type or path" },
    upload_no_url    = { r#"{"type": "upload", "path": "/tmp/x"}"#, "missing url" },
    copy_no_dest     = { r#"{"type": "copy", "path": "/tmp/x"}"#, "missing dest_path" },
    chmod_no_mode    = { r#"{"type": "chmod", "path": "/tmp/x"}"#, "missing permission" },
    chmod_bad_octal  = { r#"{"type": "chmod", "path": "/tmp/x", "permission": "99z"}"#, "invalid octal" },
    unknown_type     = { r#"{"type": "shred", "path": "/tmp/x"}"#, "unknown file operation type: shred" },
    not_json         = { r#"not json"#, "not valid JSON" },
)]
fn invalid_payloads_fail_validation(payload: &str, needle: &str) {
    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    let err = run(execute(&fetcher, payload)).unwrap_err();
    assert!(matches!(err, DispatchError::Validation(_)), "got {err:?}");
    assert!(err.to_string().contains(needle), "{err} missing {needle:?}");
}

#[tokio::test]
async fn missing_fields_cause_no_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.txt");
    let payload = format!(r#"{{"type": "copy", "path": "{}"}}"#, dest.display());

    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    assert!(execute(&fetcher, &payload).await.is_err());
    assert!(!dest.exists());
}

#[tokio::test]
async fn copy_round_trips_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.bin");
    let dest = dir.path().join("dest.bin");
    std::fs::write(&src, b"payload bytes").unwrap();

    let payload = format!(
        r#"{{"type": "copy", "path": "{}", "dest_path": "{}"}}"#,
        src.display(),
        dest.display()
    );
    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    let msg = execute(&fetcher, &payload).await.unwrap();

    assert!(msg.contains("copied"));
    assert_eq!(std::fs::read(&dest).unwrap(), std::fs::read(&src).unwrap());
}

#[tokio::test]
async fn copy_failure_is_an_execution_error() {
    let dir = tempfile::tempdir().unwrap();
    let payload = format!(
        r#"{{"type": "copy", "path": "{}", "dest_path": "{}"}}"#,
        dir.path().join("missing.bin").display(),
        dir.path().join("dest.bin").display()
    );
    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    let err = execute(&fetcher, &payload).await.unwrap_err();
    assert!(matches!(err, DispatchError::Execution(_)), "got {err:?}");
}

#[tokio::test]
async fn chmod_applies_octal_mode() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("script.sh");
    std::fs::write(&file, "#!/bin/sh\n").unwrap();

    let payload = format!(
        r#"{{"type": "chmod", "path": "{}", "permission": "755"}}"#,
        file.display()
    );
    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    execute(&fetcher, &payload).await.unwrap();

    let mode = std::fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[tokio::test]
async fn upload_fetches_to_local_path() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("fixture.bin");
    std::fs::write(&fixture, b"remote bytes").unwrap();
    let dest = dir.path().join("fetched.bin");

    let payload = format!(
        r#"{{"type": "upload", "path": "{}", "url": "http://example/r"}}"#,
        dest.display()
    );
    let fetcher = LocalFetcher { src: fixture };
    let msg = execute(&fetcher, &payload).await.unwrap();

    assert!(msg.contains("fetched"));
    assert_eq!(std::fs::read(&dest).unwrap(), b"remote bytes");
}

#[tokio::test]
async fn push_to_remote_is_acknowledged_not_implemented() {
    let payload = r#"{"type": "download", "path": "/tmp/x"}"#;
    let fetcher = LocalFetcher { src: PathBuf::from("/nonexistent") };
    let msg = execute(&fetcher, payload).await.unwrap();
    assert!(msg.contains("not implemented"));
}
