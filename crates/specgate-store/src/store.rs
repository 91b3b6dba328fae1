//! Snapshot persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::artifact::{SnapshotArtifact, SnapshotKind};
use crate::atomic::atomic_write;
use crate::errors::{io_error, serialization_error, snapshot_corrupt, Result};

/// Storage for committed snapshot artifacts, one per kind.
///
/// Implementations are injected into the orchestrator; nothing in the
/// pipeline reaches for ambient global state.
pub trait SnapshotStore {
    /// Load the committed artifact for a kind, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotCorrupt` when an artifact exists but fails
    /// integrity verification. A missing artifact is `Ok(None)`, not an
    /// error.
    fn load(&self, kind: SnapshotKind) -> Result<Option<SnapshotArtifact>>;

    /// Persist the artifact for a kind, replacing any previous one.
    fn store(&self, kind: SnapshotKind, artifact: &SnapshotArtifact) -> Result<()>;
}

/// Filesystem store: one pretty-printed JSON file per kind under a root
/// directory, written atomically.
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, kind: SnapshotKind) -> PathBuf {
        self.root.join(kind.file_name())
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, kind: SnapshotKind) -> Result<Option<SnapshotArtifact>> {
        let path = self.path_for(kind);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(snapshot_kind = %kind, "no committed snapshot");
                return Ok(None);
            }
            Err(e) => return Err(io_error("read_snapshot", e)),
        };

        let location = path.display().to_string();
        let artifact: SnapshotArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| snapshot_corrupt(&location, format!("not a valid artifact: {}", e)))?;

        if artifact.kind != kind {
            return Err(snapshot_corrupt(
                &location,
                format!("artifact records kind {}, expected {}", artifact.kind, kind),
            ));
        }
        artifact.verify(&location)?;
        Ok(Some(artifact))
    }

    fn store(&self, kind: SnapshotKind, artifact: &SnapshotArtifact) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(artifact)
            .map_err(|e| serialization_error("store_snapshot", e))?;
        atomic_write(&self.path_for(kind), &bytes)?;
        debug!(snapshot_kind = %kind, "snapshot stored");
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct MemorySnapshotStore {
    artifacts: Mutex<BTreeMap<SnapshotKind, SnapshotArtifact>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a committed artifact directly
    pub fn with_artifact(self, artifact: SnapshotArtifact) -> Self {
        if let Ok(mut artifacts) = self.artifacts.lock() {
            artifacts.insert(artifact.kind, artifact);
        }
        self
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, kind: SnapshotKind) -> Result<Option<SnapshotArtifact>> {
        let artifacts = self
            .artifacts
            .lock()
            .map_err(|_| snapshot_corrupt("memory", "store mutex poisoned"))?;
        match artifacts.get(&kind) {
            Some(artifact) => {
                artifact.verify("memory")?;
                Ok(Some(artifact.clone()))
            }
            None => Ok(None),
        }
    }

    fn store(&self, kind: SnapshotKind, artifact: &SnapshotArtifact) -> Result<()> {
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| snapshot_corrupt("memory", "store mutex poisoned"))?;
        artifacts.insert(kind, artifact.clone());
        Ok(())
    }
}
