//! Diff computation engine.
//!
//! The core entry point is [`compute_diff`], which accepts two validated
//! schema models of the same kind and produces a deterministic, ordered
//! list of atomic [`Change`] records. Emitted order carries no semantic
//! meaning; the list is sorted by location purely so output is stable for
//! testing and reporting.

use crate::diff::model::{Change, ChangeAspect, ChangeKind, ChangeLocation, ChangeSnapshot};
use crate::errors::{GateError, GateErrorKind, Result};
use crate::model::{walk, FieldPath, NodeFacts, NodeShape, Operation, SchemaModel};
use std::collections::{BTreeMap, BTreeSet};

/// Compute the structural diff between two schema models.
///
/// Operation-level additions/removals are emitted as a single change at the
/// operation root; field-level changes are emitted only for operations
/// present in both models, with added/removed subtrees collapsed to their
/// root position to avoid duplicate reporting.
///
/// # Errors
///
/// - `WrongDocumentKind` — the models were parsed as different kinds
/// - `ReferenceResolution` — traversal hit an unresolvable reference
///   (unreachable for models built via `SchemaModel::parse`)
/// - `DeterminismViolation` — the computed diff failed its round-trip
///   sanity check (a defect, never expected in correct builds)
pub fn compute_diff(old: &SchemaModel, new: &SchemaModel) -> Result<Vec<Change>> {
    if old.kind() != new.kind() {
        return Err(GateError::new(GateErrorKind::WrongDocumentKind)
            .with_op("compute_diff")
            .with_message(format!(
                "cannot diff `{}` model against `{}` model",
                old.kind().name(),
                new.kind().name()
            )));
    }

    let mut changes: Vec<Change> = Vec::new();

    diff_document_metadata(old, new, &mut changes);

    // Operation set delta
    let old_keys: BTreeSet<_> = old.operation_keys().cloned().collect();
    let new_keys: BTreeSet<_> = new.operation_keys().cloned().collect();

    for key in old_keys.difference(&new_keys) {
        if let Some(op) = old.operation(key) {
            changes.push(Change::new(
                ChangeLocation::operation(key.clone(), FieldPath::root()),
                ChangeKind::Removed,
                None,
                Some(operation_snapshot(op)),
                None,
            ));
        }
    }
    for key in new_keys.difference(&old_keys) {
        if let Some(op) = new.operation(key) {
            changes.push(Change::new(
                ChangeLocation::operation(key.clone(), FieldPath::root()),
                ChangeKind::Added,
                None,
                None,
                Some(operation_snapshot(op)),
            ));
        }
    }

    // Field-level changes for operations on both sides
    for key in old_keys.intersection(&new_keys) {
        if let (Some(old_op), Some(new_op)) = (old.operation(key), new.operation(key)) {
            diff_operation(old, new, old_op, new_op, &mut changes)?;
        }
    }

    // Deterministic output order: by location, then kind, then aspect
    changes.sort_by(|a, b| {
        a.location
            .to_string()
            .cmp(&b.location.to_string())
            .then_with(|| format!("{:?}", a.kind).cmp(&format!("{:?}", b.kind)))
            .then_with(|| format!("{:?}", a.aspect).cmp(&format!("{:?}", b.aspect)))
    });

    // Determinism guard: round-trip through JSON must produce an equal list
    let serialized = serde_json::to_string(&changes).map_err(|e| {
        GateError::new(GateErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message(format!("failed to serialize diff: {}", e))
    })?;
    let reparsed: Vec<Change> = serde_json::from_str(&serialized).map_err(|e| {
        GateError::new(GateErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message(format!("failed to re-parse diff: {}", e))
    })?;
    if reparsed != changes {
        return Err(GateError::new(GateErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message("diff is not deterministic: round-trip produced different list"));
    }

    Ok(changes)
}

fn diff_document_metadata(old: &SchemaModel, new: &SchemaModel, changes: &mut Vec<Change>) {
    let fields: &[(&str, Option<&str>, Option<&str>)] = &[
        ("title", old.title(), new.title()),
        ("version", old.version(), new.version()),
        ("description", old.description(), new.description()),
    ];
    for (name, old_value, new_value) in fields {
        if old_value != new_value {
            changes.push(Change::new(
                ChangeLocation::document(FieldPath::from_segments(["meta", name])),
                ChangeKind::Modified,
                Some(ChangeAspect::Metadata),
                old_value.map(|v| ChangeSnapshot::Text(v.to_string())),
                new_value.map(|v| ChangeSnapshot::Text(v.to_string())),
            ));
        }
    }
}

fn operation_snapshot(op: &Operation) -> ChangeSnapshot {
    ChangeSnapshot::Operation {
        parameter_count: op.parameters.len(),
        response_statuses: op.responses.keys().copied().collect(),
        has_request: op.request.is_some(),
    }
}

fn diff_operation(
    old_model: &SchemaModel,
    new_model: &SchemaModel,
    old_op: &Operation,
    new_op: &Operation,
    changes: &mut Vec<Change>,
) -> Result<()> {
    let key = &old_op.key;

    if old_op.description != new_op.description {
        changes.push(Change::new(
            ChangeLocation::operation(key.clone(), FieldPath::root()),
            ChangeKind::Modified,
            Some(ChangeAspect::Metadata),
            old_op.description.clone().map(ChangeSnapshot::Text),
            new_op.description.clone().map(ChangeSnapshot::Text),
        ));
    }

    // Parameter reordering: same name set, different declared order
    let old_param_names: Vec<&str> = old_op.parameters.iter().map(|p| p.name.as_str()).collect();
    let new_param_names: Vec<&str> = new_op.parameters.iter().map(|p| p.name.as_str()).collect();
    let old_param_set: BTreeSet<&str> = old_param_names.iter().copied().collect();
    let new_param_set: BTreeSet<&str> = new_param_names.iter().copied().collect();
    if old_param_set == new_param_set && old_param_names != new_param_names {
        changes.push(Change::new(
            ChangeLocation::operation(key.clone(), FieldPath::from_segments(["request", "param"])),
            ChangeKind::ReorderedIrrelevant,
            None,
            Some(ChangeSnapshot::Text(old_param_names.join(","))),
            Some(ChangeSnapshot::Text(new_param_names.join(","))),
        ));
    }

    let old_positions: BTreeMap<FieldPath, NodeFacts> =
        walk(old_model, old_op)?.into_iter().collect();
    let new_positions: BTreeMap<FieldPath, NodeFacts> =
        walk(new_model, new_op)?.into_iter().collect();

    let old_paths: BTreeSet<&FieldPath> = old_positions.keys().collect();
    let new_paths: BTreeSet<&FieldPath> = new_positions.keys().collect();

    // Added/removed positions, collapsed to subtree roots: a path whose
    // parent is also added (or removed) is implied and not reported twice.
    let added: Vec<&FieldPath> = new_paths.difference(&old_paths).copied().collect();
    let removed: Vec<&FieldPath> = old_paths.difference(&new_paths).copied().collect();
    let added_set: BTreeSet<&FieldPath> = added.iter().copied().collect();
    let removed_set: BTreeSet<&FieldPath> = removed.iter().copied().collect();

    for path in &added {
        if subtree_root(path, &added_set) {
            changes.push(Change::new(
                ChangeLocation::operation(key.clone(), (*path).clone()),
                ChangeKind::Added,
                None,
                None,
                Some(ChangeSnapshot::Node(new_positions[*path].clone())),
            ));
        }
    }
    for path in &removed {
        if subtree_root(path, &removed_set) {
            changes.push(Change::new(
                ChangeLocation::operation(key.clone(), (*path).clone()),
                ChangeKind::Removed,
                None,
                Some(ChangeSnapshot::Node(old_positions[*path].clone())),
                None,
            ));
        }
    }

    // Positions on both sides: compare facts, one change per aspect
    for path in old_paths.intersection(&new_paths) {
        let old_facts = &old_positions[*path];
        let new_facts = &new_positions[*path];
        diff_position(key, path, old_facts, new_facts, changes);
    }

    Ok(())
}

/// True when no ancestor of `path` is in `set`
fn subtree_root(path: &FieldPath, set: &BTreeSet<&FieldPath>) -> bool {
    let mut current = path.parent();
    while let Some(ancestor) = current {
        if set.contains(&ancestor) {
            return false;
        }
        current = ancestor.parent();
    }
    true
}

fn diff_position(
    key: &crate::model::OperationKey,
    path: &FieldPath,
    old_facts: &NodeFacts,
    new_facts: &NodeFacts,
    changes: &mut Vec<Change>,
) {
    if let Some(aspect) = shape_aspect(&old_facts.shape, &new_facts.shape) {
        changes.push(Change::new(
            ChangeLocation::operation(key.clone(), path.clone()),
            ChangeKind::Modified,
            Some(aspect),
            Some(ChangeSnapshot::Node(old_facts.clone())),
            Some(ChangeSnapshot::Node(new_facts.clone())),
        ));
    }

    // Requiredness is always a separate record from a type change at the
    // same path; policies may tolerate one but not the other.
    if old_facts.required != new_facts.required {
        changes.push(Change::new(
            ChangeLocation::operation(key.clone(), path.clone()),
            ChangeKind::Modified,
            Some(ChangeAspect::Requiredness),
            Some(ChangeSnapshot::Node(old_facts.clone())),
            Some(ChangeSnapshot::Node(new_facts.clone())),
        ));
    }

    if old_facts.description != new_facts.description {
        changes.push(Change::new(
            ChangeLocation::operation(key.clone(), path.clone()),
            ChangeKind::Modified,
            Some(ChangeAspect::Metadata),
            old_facts
                .description
                .clone()
                .map(ChangeSnapshot::Text),
            new_facts
                .description
                .clone()
                .map(ChangeSnapshot::Text),
        ));
    }
}

/// Which aspect, if any, distinguishes two shapes.
///
/// Two enums differing only in their value set are an `EnumValues` change;
/// any openness or kind difference is a `Type` change; differing cycle-cut
/// references are a `ReferenceTarget` change.
fn shape_aspect(old: &NodeShape, new: &NodeShape) -> Option<ChangeAspect> {
    match (old, new) {
        (
            NodeShape::Enum {
                base: old_base,
                values: old_values,
                open: old_open,
            },
            NodeShape::Enum {
                base: new_base,
                values: new_values,
                open: new_open,
            },
        ) => {
            if old_base == new_base && old_open == new_open {
                if old_values != new_values {
                    Some(ChangeAspect::EnumValues)
                } else {
                    None
                }
            } else {
                Some(ChangeAspect::Type)
            }
        }
        (NodeShape::Reference { name: old_name }, NodeShape::Reference { name: new_name }) => {
            if old_name != new_name {
                Some(ChangeAspect::ReferenceTarget)
            } else {
                None
            }
        }
        (a, b) if a == b => None,
        _ => Some(ChangeAspect::Type),
    }
}

/// Convenience predicate used by tests and the orchestrator: a change set
/// is a no-op when empty.
pub fn is_noop(changes: &[Change]) -> bool {
    changes.is_empty()
}
