//! Snapshot artifact format.
//!
//! An artifact wraps one committed contract document together with enough
//! metadata to detect corruption on load. The document itself is kept as
//! raw JSON; parsing into a `SchemaModel` happens at check time so that a
//! stored artifact never silently changes meaning across parser versions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as _, Sha256};
use specgate_core::model::DocumentKind;

use crate::errors::{snapshot_corrupt, Result};

/// Current artifact format version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// The three contract surfaces tracked by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotKind {
    Interface,
    EventEnvelope,
    EventPayload,
}

impl SnapshotKind {
    /// All kinds in canonical processing order
    pub fn all() -> [SnapshotKind; 3] {
        [
            SnapshotKind::Interface,
            SnapshotKind::EventEnvelope,
            SnapshotKind::EventPayload,
        ]
    }

    /// The document kind a snapshot of this kind contains
    pub fn document_kind(&self) -> DocumentKind {
        match self {
            SnapshotKind::Interface => DocumentKind::Interface,
            SnapshotKind::EventEnvelope | SnapshotKind::EventPayload => DocumentKind::Event,
        }
    }

    /// Canonical artifact file name under the store root
    pub fn file_name(&self) -> &'static str {
        match self {
            SnapshotKind::Interface => "interface.snapshot.json",
            SnapshotKind::EventEnvelope => "event-envelope.snapshot.json",
            SnapshotKind::EventPayload => "event-payload.snapshot.json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnapshotKind::Interface => "interface",
            SnapshotKind::EventEnvelope => "event-envelope",
            SnapshotKind::EventPayload => "event-payload",
        }
    }
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One committed contract document with integrity metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotArtifact {
    pub snapshot_schema_version: u32,
    pub kind: SnapshotKind,
    /// RFC3339 creation timestamp; informational, excluded from the digest
    pub created_at: String,
    /// sha256 hex of the canonical document JSON
    pub content_digest: String,
    pub document: Value,
}

impl SnapshotArtifact {
    /// Wrap a document, stamping the current time and its digest
    pub fn new(kind: SnapshotKind, document: Value) -> Self {
        let content_digest = content_digest(&document);
        Self {
            snapshot_schema_version: SNAPSHOT_SCHEMA_VERSION,
            kind,
            created_at: Utc::now().to_rfc3339(),
            content_digest,
            document,
        }
    }

    /// Check the recorded digest and format version against the document.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotCorrupt` on any mismatch.
    pub fn verify(&self, location: &str) -> Result<()> {
        if self.snapshot_schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(snapshot_corrupt(
                location,
                format!(
                    "unsupported snapshot_schema_version {}",
                    self.snapshot_schema_version
                ),
            ));
        }
        let computed = content_digest(&self.document);
        if computed != self.content_digest {
            return Err(snapshot_corrupt(
                location,
                format!(
                    "content digest mismatch: recorded {}, computed {}",
                    digest_prefix(&self.content_digest),
                    digest_prefix(&computed)
                ),
            ));
        }
        Ok(())
    }
}

/// Abbreviate a digest for error messages. Char-based so a corrupted
/// file with a multibyte digest string cannot split a byte boundary.
fn digest_prefix(digest: &str) -> String {
    digest.chars().take(12).collect()
}

/// sha256 hex over the canonical (sorted-key) JSON serialization
pub fn content_digest(document: &Value) -> String {
    let mut hasher = Sha256::new();
    // serde_json maps are key-sorted, so this serialization is canonical
    // for semantically equal documents.
    hasher.update(document.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({ "kind": "interface", "operations": [] })
    }

    #[test]
    fn test_kind_document_mapping() {
        assert_eq!(
            SnapshotKind::Interface.document_kind(),
            DocumentKind::Interface
        );
        assert_eq!(
            SnapshotKind::EventEnvelope.document_kind(),
            DocumentKind::Event
        );
        assert_eq!(
            SnapshotKind::EventPayload.document_kind(),
            DocumentKind::Event
        );
    }

    #[test]
    fn test_file_names_are_distinct() {
        let names: std::collections::BTreeSet<_> =
            SnapshotKind::all().iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_artifact_verify_round_trip() {
        let artifact = SnapshotArtifact::new(SnapshotKind::Interface, doc());
        artifact.verify("mem").unwrap();
    }

    #[test]
    fn test_tampered_document_fails_verify() {
        let mut artifact = SnapshotArtifact::new(SnapshotKind::Interface, doc());
        artifact.document["operations"] = json!([{ "path": "/x", "method": "GET" }]);
        let err = artifact.verify("mem").unwrap_err();
        assert_eq!(
            err.kind(),
            specgate_core::errors::GateErrorKind::SnapshotCorrupt
        );
    }

    #[test]
    fn test_multibyte_recorded_digest_is_error_not_panic() {
        let mut artifact = SnapshotArtifact::new(SnapshotKind::Interface, doc());
        // Hand-corrupted file: digest replaced with multibyte text that
        // straddles the 12-byte mark.
        artifact.content_digest = "aáááááá".to_string();
        let err = artifact.verify("mem").unwrap_err();
        assert_eq!(
            err.kind(),
            specgate_core::errors::GateErrorKind::SnapshotCorrupt
        );
    }

    #[test]
    fn test_digest_ignores_key_order() {
        let a = json!({ "kind": "interface", "operations": [], "title": "t" });
        let b = json!({ "title": "t", "operations": [], "kind": "interface" });
        assert_eq!(content_digest(&a), content_digest(&b));
    }

    #[test]
    fn test_unsupported_version_fails_verify() {
        let mut artifact = SnapshotArtifact::new(SnapshotKind::Interface, doc());
        artifact.snapshot_schema_version = 99;
        assert!(artifact.verify("mem").is_err());
    }
}
