//! Current-side input documents, one per snapshot kind.

use std::collections::BTreeMap;

use serde_json::Value;
use specgate_store::SnapshotKind;

/// The raw contract documents supplied for one run.
///
/// Only the kinds present are processed; a run may cover any subset of
/// the three surfaces.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    documents: BTreeMap<SnapshotKind, Value>,
}

impl RunInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, kind: SnapshotKind, document: Value) -> Self {
        self.documents.insert(kind, document);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in canonical kind order
    pub fn iter(&self) -> impl Iterator<Item = (SnapshotKind, &Value)> {
        self.documents.iter().map(|(kind, doc)| (*kind, doc))
    }
}
