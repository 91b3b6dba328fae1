//! Filesystem snapshot store integration tests.

use serde_json::json;
use specgate_store::{FsSnapshotStore, SnapshotArtifact, SnapshotKind, SnapshotStore};
use tempfile::TempDir;

fn interface_artifact() -> SnapshotArtifact {
    SnapshotArtifact::new(
        SnapshotKind::Interface,
        json!({
            "kind": "interface",
            "operations": [
                { "path": "/areas", "method": "GET",
                  "responses": { "200": { "type": "object", "fields": {} } } }
            ]
        }),
    )
}

#[test]
fn test_store_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    let artifact = interface_artifact();
    store.store(SnapshotKind::Interface, &artifact).unwrap();

    let loaded = store.load(SnapshotKind::Interface).unwrap().unwrap();
    assert_eq!(loaded, artifact);
}

#[test]
fn test_missing_artifact_is_none() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    assert!(store.load(SnapshotKind::EventEnvelope).unwrap().is_none());
}

#[test]
fn test_kinds_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    let interface = interface_artifact();
    let envelope = SnapshotArtifact::new(
        SnapshotKind::EventEnvelope,
        json!({ "kind": "event", "events": [] }),
    );
    store.store(SnapshotKind::Interface, &interface).unwrap();
    store.store(SnapshotKind::EventEnvelope, &envelope).unwrap();

    assert_eq!(
        store.load(SnapshotKind::Interface).unwrap().unwrap(),
        interface
    );
    assert_eq!(
        store.load(SnapshotKind::EventEnvelope).unwrap().unwrap(),
        envelope
    );
}

#[test]
fn test_store_replaces_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    store
        .store(SnapshotKind::Interface, &interface_artifact())
        .unwrap();
    let updated = SnapshotArtifact::new(
        SnapshotKind::Interface,
        json!({ "kind": "interface", "operations": [] }),
    );
    store.store(SnapshotKind::Interface, &updated).unwrap();

    assert_eq!(store.load(SnapshotKind::Interface).unwrap().unwrap(), updated);
}

#[test]
fn test_corrupted_file_is_snapshot_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    store
        .store(SnapshotKind::Interface, &interface_artifact())
        .unwrap();
    let path = dir.path().join(SnapshotKind::Interface.file_name());
    std::fs::write(&path, b"{ not json").unwrap();

    let err = store.load(SnapshotKind::Interface).unwrap_err();
    assert_eq!(
        err.kind(),
        specgate_core::errors::GateErrorKind::SnapshotCorrupt
    );
}

#[test]
fn test_digest_tampering_is_snapshot_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    store
        .store(SnapshotKind::Interface, &interface_artifact())
        .unwrap();
    let path = dir.path().join(SnapshotKind::Interface.file_name());
    let mut artifact: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    artifact["document"]["operations"] = json!([]);
    std::fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();

    let err = store.load(SnapshotKind::Interface).unwrap_err();
    assert_eq!(
        err.kind(),
        specgate_core::errors::GateErrorKind::SnapshotCorrupt
    );
}

#[test]
fn test_mismatched_kind_is_snapshot_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = FsSnapshotStore::new(dir.path());

    // Write an envelope artifact into the interface slot by hand.
    let envelope = SnapshotArtifact::new(
        SnapshotKind::EventEnvelope,
        json!({ "kind": "event", "events": [] }),
    );
    let path = dir.path().join(SnapshotKind::Interface.file_name());
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    let err = store.load(SnapshotKind::Interface).unwrap_err();
    assert_eq!(
        err.kind(),
        specgate_core::errors::GateErrorKind::SnapshotCorrupt
    );
}
