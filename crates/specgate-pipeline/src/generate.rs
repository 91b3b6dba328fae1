//! The generate run mode: validate current documents and commit them as
//! the new baseline snapshots. No diff or policy step.

use std::time::Instant;

use serde_json::Value;
use specgate_core::errors::GateError;
use specgate_core::model::SchemaModel;
use specgate_core::{log_op_end, log_op_error, log_op_start};
use specgate_store::{SnapshotArtifact, SnapshotKind, SnapshotStore};

use crate::inputs::RunInputs;
use crate::status::ExitStatus;

/// Full outcome of one generate run
#[derive(Debug)]
pub struct GenerateOutcome {
    /// Kinds whose snapshots were written
    pub stored: Vec<SnapshotKind>,
    /// Kinds that failed; siblings are still committed
    pub errors: Vec<(SnapshotKind, GateError)>,
    pub status: ExitStatus,
}

/// Validate each supplied document and persist it as the committed
/// snapshot for its kind.
///
/// A document is parsed before it is stored; a snapshot that cannot be
/// parsed back at check time must never be committed in the first place.
pub fn run_generate(inputs: &RunInputs, store: &dyn SnapshotStore) -> GenerateOutcome {
    let started = Instant::now();
    log_op_start!("generate");

    let mut stored = Vec::new();
    let mut errors = Vec::new();
    for (kind, document) in inputs.iter() {
        match generate_kind(kind, document, store) {
            Ok(()) => stored.push(kind),
            Err(err) => errors.push((kind, err)),
        }
    }

    let status = if errors.is_empty() {
        ExitStatus::Pass
    } else {
        ExitStatus::InputError
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match errors.first() {
        Some((_, err)) => {
            log_op_error!("generate", err.clone(), duration_ms = duration_ms);
        }
        None => {
            log_op_end!(
                "generate",
                duration_ms = duration_ms,
                snapshot_count = stored.len()
            );
        }
    }

    GenerateOutcome {
        stored,
        errors,
        status,
    }
}

fn generate_kind(
    kind: SnapshotKind,
    document: &Value,
    store: &dyn SnapshotStore,
) -> Result<(), GateError> {
    SchemaModel::parse(kind.document_kind(), document)?;
    let artifact = SnapshotArtifact::new(kind, document.clone());
    store.store(kind, &artifact)
}
