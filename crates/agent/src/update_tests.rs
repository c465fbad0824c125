// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use std::collections::BTreeMap;
use std::io::Write;

use async_trait::async_trait;
use patrol_client::ClientError;

/// Fetcher that serves a local file instead of a URL.
struct LocalFetcher {
    src: PathBuf,
}

#[async_trait]
impl Fetcher for LocalFetcher {
    async fn fetch_to_file(&self, _url: &str, dest: &Path) -> Result<(), ClientError> {
        tokio::fs::copy(&self.src, dest).await?;
        Ok(())
    }
}

/// Write a zip with the given name→contents entries.
fn write_package(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

/// Snapshot a directory's regular files as name → contents.
fn dir_contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut map = BTreeMap::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_type().unwrap().is_file() {
            map.insert(
                entry.file_name().to_string_lossy().into_owned(),
                std::fs::read(entry.path()).unwrap(),
            );
        }
    }
    map
}

struct Fixture {
    _root: tempfile::TempDir,
    config: UpdateConfig,
    package: PathBuf,
}

fn fixture(rollback_timeout: Duration) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let install_dir = root.path().join("install");
    std::fs::create_dir_all(&install_dir).unwrap();
    std::fs::write(install_dir.join(ENTRY_POINT), b"old binary").unwrap();
    std::fs::write(install_dir.join("notes.txt"), b"old notes").unwrap();

    Fixture {
        config: UpdateConfig {
            install_dir,
            staging_dir: root.path().join("staging"),
            backup_root: root.path().join("backups"),
            rollback_timeout,
        },
        package: root.path().join("package.zip"),
        _root: root,
    }
}

fn engine(fx: &Fixture) -> UpdateEngine<LocalFetcher> {
    UpdateEngine::new(Arc::new(LocalFetcher { src: fx.package.clone() }), fx.config.clone())
}

#[yare::parameterized(
    empty        = { r#"{}"# },
    only_url     = { r#"{"url": "http://example/pkg.zip"}"# },
    only_version = { r#"{"version": "2.0"}"# },
    not_json     = { r#"oops"# },
)]
fn invalid_payload_fails_without_side_effects(payload: &str) {
    let fx = fixture(Duration::from_secs(300));
    let engine = engine(&fx);

    let err = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(engine.run(payload))
        .unwrap_err();

    assert!(matches!(err, DispatchError::Validation(_)), "got {err:?}");
    assert!(!fx.config.backup_root.exists());
    assert!(!fx.config.staging_dir.exists());
}

#[tokio::test]
async fn fetch_failure_leaves_install_untouched() {
    let fx = fixture(Duration::from_secs(300));
    // Package file never created, so the fetch will fail.
    let engine = engine(&fx);
    let before = dir_contents(&fx.config.install_dir);

    let err = engine
        .run(r#"{"url": "http://example/pkg.zip", "version": "2.0"}"#)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed to fetch"), "{err}");
    assert_eq!(dir_contents(&fx.config.install_dir), before);
    // No partial package is left behind in staging.
    assert!(!fx.config.staging_dir.exists());
}

#[tokio::test]
async fn missing_entry_point_is_rejected_before_apply() {
    let fx = fixture(Duration::from_secs(300));
    write_package(&fx.package, &[("extra.txt", b"new file")]);
    let engine = engine(&fx);
    let before = dir_contents(&fx.config.install_dir);

    let err = engine
        .run(r#"{"url": "http://example/pkg.zip", "version": "2.0"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Integrity(_)), "got {err:?}");
    assert!(err.to_string().contains(ENTRY_POINT));
    // Idempotence of failure: the install set is unchanged.
    assert_eq!(dir_contents(&fx.config.install_dir), before);
    // The harmless backup is left in place; staging is not.
    assert!(fx.config.backup_root.exists());
    assert!(!fx.config.staging_dir.exists());
}

#[tokio::test]
async fn applies_package_then_rolls_back_after_timeout() {
    let fx = fixture(Duration::from_millis(300));
    write_package(
        &fx.package,
        &[(ENTRY_POINT, b"new binary" as &[u8]), ("extra.txt", b"new file")],
    );
    let engine = engine(&fx);
    let before = dir_contents(&fx.config.install_dir);

    let result = engine
        .run(r#"{"url": "http://example/pkg.zip", "version": "2.0"}"#)
        .await
        .unwrap();

    // Success mentions the new version and returns without waiting for
    // the watch period.
    assert!(result.contains("2.0"), "{result}");

    // The new release is live.
    let after = dir_contents(&fx.config.install_dir);
    assert_eq!(after.get(ENTRY_POINT).map(Vec::as_slice), Some(b"new binary" as &[u8]));
    assert_eq!(after.get("extra.txt").map(Vec::as_slice), Some(b"new file" as &[u8]));
    // Untouched files survive the apply.
    assert_eq!(after.get("notes.txt").map(Vec::as_slice), Some(b"old notes" as &[u8]));

    // A backup snapshot of the pre-update files exists.
    let backups: Vec<_> = std::fs::read_dir(&fx.config.backup_root).unwrap().collect();
    assert_eq!(backups.len(), 1);
    let backup_dir = backups[0].as_ref().unwrap().path();
    assert_eq!(dir_contents(&backup_dir), before);

    // Staging scratch space is cleaned after a successful apply.
    assert!(!fx.config.staging_dir.exists());

    // The watchdog reverts unconditionally once the timeout elapses.
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(dir_contents(&fx.config.install_dir), before);
}

#[tokio::test]
async fn archive_itself_is_not_applied() {
    let fx = fixture(Duration::from_secs(300));
    write_package(&fx.package, &[(ENTRY_POINT, b"new binary")]);
    let engine = engine(&fx);

    engine
        .run(r#"{"url": "http://example/pkg.zip", "version": "3.1"}"#)
        .await
        .unwrap();

    let after = dir_contents(&fx.config.install_dir);
    assert!(!after.contains_key("update_3.1.zip"));
}
