// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn entry(name: &str, pid: u32) -> ProcessEntry {
    ProcessEntry {
        name: name.to_string(),
        pid,
        command: format!("run {name}"),
        start_time: Utc::now(),
        log_file: PathBuf::from(format!(".devcmd/{name}.log")),
        status: ProcessStatus::Running,
    }
}

#[test]
fn open_creates_state_dir() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();
    assert!(registry.dir().is_dir());
    assert!(registry.dir().ends_with(STATE_DIR));
}

#[test]
fn empty_registry_loads_empty() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();
    assert!(registry.load().unwrap().is_empty());
}

#[test]
fn register_and_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();

    // Use our own pid so the entry survives the liveness reaping.
    let me = std::process::id();
    registry.register(entry("server", me)).unwrap();

    let loaded = registry.get("server").unwrap().unwrap();
    assert_eq!(loaded.pid, me);
    assert_eq!(loaded.command, "run server");
    assert_eq!(loaded.status, ProcessStatus::Running);
}

#[test]
fn stale_entries_are_reaped_on_load() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();

    // A pid from far outside the live range.
    registry.register(entry("ghost", u32::MAX - 7)).unwrap();
    assert!(registry.load().unwrap().is_empty());
    assert!(registry.get("ghost").unwrap().is_none());
}

#[test]
fn remove_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();

    registry.register(entry("a", std::process::id())).unwrap();
    registry.remove("a").unwrap();
    registry.remove("a").unwrap();
    assert!(registry.load().unwrap().is_empty());
}

#[test]
fn registry_file_is_ordered_json() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();
    let me = std::process::id();
    registry.register(entry("web", me)).unwrap();
    registry.register(entry("api", me)).unwrap();

    let raw = std::fs::read_to_string(registry.dir().join(REGISTRY_FILE)).unwrap();
    // Insertion order is preserved (web registered before api).
    assert!(raw.find("\"web\"").unwrap() < raw.find("\"api\"").unwrap());

    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed["web"]["start_time"].is_string());
    assert_eq!(parsed["web"]["status"], "running");
}

#[tokio::test]
async fn graceful_stop_terminates_and_removes() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();

    let mut child = std::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .unwrap();
    registry.register(entry("sleeper", child.id())).unwrap();

    registry
        .graceful_stop("sleeper", Duration::from_secs(2))
        .await
        .unwrap();

    assert!(registry.get("sleeper").unwrap().is_none());
    // Reap; the child was terminated by the graceful stop.
    let status = child.wait().unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn graceful_stop_unknown_name_errors() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();
    let err = registry
        .graceful_stop("missing", Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(name) if name == "missing"));
}

#[test]
fn corrupt_registry_is_reported() {
    let dir = TempDir::new().unwrap();
    let registry = ProcessRegistry::open(dir.path()).unwrap();
    std::fs::write(registry.dir().join(REGISTRY_FILE), "{ not json").unwrap();
    let err = registry.load().unwrap_err();
    assert!(matches!(err, RegistryError::Corrupt { .. }));
}
