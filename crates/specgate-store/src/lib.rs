//! Specgate Store - Committed snapshot persistence
//!
//! Stores one integrity-checked artifact per snapshot kind. The filesystem
//! implementation uses atomic temp-then-rename writes so an interrupted
//! `generate` can never leave a torn artifact behind.

pub mod artifact;
pub mod atomic;
pub mod errors;
pub mod store;

pub use artifact::{content_digest, SnapshotArtifact, SnapshotKind, SNAPSHOT_SCHEMA_VERSION};
pub use store::{FsSnapshotStore, MemorySnapshotStore, SnapshotStore};
