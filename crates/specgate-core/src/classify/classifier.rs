//! The classifier: maps every atomic change to exactly one compatibility
//! class via a fixed, total rule table.
//!
//! Totality is by construction: the match arms below cover every change
//! the diff engine can emit. A combination that cannot be classified is a
//! defect in this table, not a runtime condition, and panics loudly rather
//! than defaulting to a "safe" class.

use crate::classify::rules::*;
use crate::diff::model::{Change, ChangeAspect, ChangeKind, ChangeSnapshot};
use crate::model::{Direction, NodeFacts, NodeShape, OperationKey, PrimitiveKind};

/// Classify a full change list in order
pub fn classify_all(changes: &[Change]) -> Vec<ClassifiedChange> {
    changes.iter().map(classify).collect()
}

/// Assign exactly one compatibility class to a change.
pub fn classify(change: &Change) -> ClassifiedChange {
    match change.kind {
        ChangeKind::ReorderedIrrelevant => ClassifiedChange::new(
            change.clone(),
            CompatClass::Informational,
            RULE_REORDERED,
            "ordering has no wire effect",
        ),
        ChangeKind::Added if change.location.path.is_root() => ClassifiedChange::new(
            change.clone(),
            CompatClass::Additive,
            RULE_OP_ADDED,
            "no existing caller is affected by a new operation",
        ),
        ChangeKind::Removed if change.location.path.is_root() => ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_OP_REMOVED,
            "existing callers of the removed operation now fail",
        ),
        ChangeKind::Added => classify_field_added(change),
        ChangeKind::Removed => classify_field_removed(change),
        ChangeKind::Modified => classify_modified(change),
    }
}

fn direction_of(change: &Change) -> Direction {
    let walked = match change.location.path.direction() {
        Some(direction) => direction,
        None => unreachable!(
            "field-level change without a directional path: {}",
            change.location
        ),
    };
    // Event payloads are walked on the request side of the path layout,
    // but subscribers consume them: their fields carry response
    // compatibility semantics.
    match (walked, change.location.operation_key()) {
        (Direction::Request, Some(OperationKey::Event { .. })) => Direction::Response,
        _ => walked,
    }
}

fn node_facts(snapshot: &Option<ChangeSnapshot>) -> &NodeFacts {
    match snapshot {
        Some(ChangeSnapshot::Node(facts)) => facts,
        _ => unreachable!("field-level change without node facts"),
    }
}

fn classify_field_added(change: &Change) -> ClassifiedChange {
    match direction_of(change) {
        Direction::Request => {
            let facts = node_facts(&change.after);
            if facts.required {
                ClassifiedChange::new(
                    change.clone(),
                    CompatClass::Breaking,
                    RULE_REQ_ADD_REQUIRED,
                    "existing callers omit the new required input, now invalid",
                )
            } else {
                ClassifiedChange::new(
                    change.clone(),
                    CompatClass::Additive,
                    RULE_REQ_ADD_OPTIONAL,
                    "optional input; existing callers remain valid",
                )
            }
        }
        Direction::Response => ClassifiedChange::new(
            change.clone(),
            CompatClass::Additive,
            RULE_RESP_ADDED,
            "consumers ignore response members they do not read",
        ),
        Direction::Meta => unreachable!("meta paths are never added or removed"),
    }
}

fn classify_field_removed(change: &Change) -> ClassifiedChange {
    match direction_of(change) {
        Direction::Request => ClassifiedChange::new(
            change.clone(),
            CompatClass::Additive,
            RULE_REQ_REMOVED,
            "callers may keep sending the input; unknown request members are ignored",
        ),
        Direction::Response => ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_RESP_REMOVED,
            "consumers reading the removed member now get absent data",
        ),
        Direction::Meta => unreachable!("meta paths are never added or removed"),
    }
}

fn classify_modified(change: &Change) -> ClassifiedChange {
    let aspect = match change.aspect {
        Some(aspect) => aspect,
        None => unreachable!("modified change without an aspect: {}", change.location),
    };
    match aspect {
        ChangeAspect::Metadata => ClassifiedChange::new(
            change.clone(),
            CompatClass::Informational,
            RULE_METADATA,
            "description/title/version only; no structural effect",
        ),
        ChangeAspect::Requiredness => {
            let after = node_facts(&change.after);
            if after.required {
                ClassifiedChange::new(
                    change.clone(),
                    CompatClass::Breaking,
                    RULE_OPTIONAL_TO_REQUIRED,
                    "strictly tightens a constraint on existing callers",
                )
            } else {
                ClassifiedChange::new(
                    change.clone(),
                    CompatClass::Additive,
                    RULE_REQUIRED_TO_OPTIONAL,
                    "strictly relaxes a constraint",
                )
            }
        }
        ChangeAspect::EnumValues => classify_enum_values(change),
        ChangeAspect::Type => classify_type_change(change),
        ChangeAspect::ReferenceTarget => ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_REF_TARGET,
            "cyclic reference now points at a different named schema",
        ),
    }
}

fn classify_enum_values(change: &Change) -> ClassifiedChange {
    let before = node_facts(&change.before);
    let after = node_facts(&change.after);
    let (old_values, new_values, open) = match (&before.shape, &after.shape) {
        (
            NodeShape::Enum {
                values: old_values,
                open,
                ..
            },
            NodeShape::Enum {
                values: new_values, ..
            },
        ) => (old_values, new_values, *open),
        _ => unreachable!("enum-values change on non-enum shapes"),
    };

    if open {
        return ClassifiedChange::new(
            change.clone(),
            CompatClass::Informational,
            RULE_ENUM_OPEN_VALUES,
            "open enums never validate membership strictly",
        );
    }

    let removed: Vec<&String> = old_values.difference(new_values).collect();
    if removed.is_empty() {
        ClassifiedChange::new(
            change.clone(),
            CompatClass::Additive,
            RULE_ENUM_CLOSED_ADDED,
            "new values extend the closed set; existing values remain valid",
        )
    } else {
        let listed: Vec<&str> = removed.iter().map(|s| s.as_str()).collect();
        ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_ENUM_CLOSED_REMOVED,
            format!(
                "previously valid values now rejected by the closed enum: {}",
                listed.join(", ")
            ),
        )
    }
}

/// Direction of a shape transition's accepted wire domain
enum TypeTransition {
    Narrowed,
    Widened,
    Incomparable,
}

fn classify_type_change(change: &Change) -> ClassifiedChange {
    let before = node_facts(&change.before);
    let after = node_facts(&change.after);
    match type_transition(&before.shape, &after.shape) {
        TypeTransition::Narrowed => ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_TYPE_NARROWED,
            "previously valid values may now be rejected",
        ),
        TypeTransition::Widened => ClassifiedChange::new(
            change.clone(),
            CompatClass::Additive,
            RULE_TYPE_WIDENED,
            "previously valid values remain valid",
        ),
        TypeTransition::Incomparable => ClassifiedChange::new(
            change.clone(),
            CompatClass::Breaking,
            RULE_TYPE_CHANGED,
            "wire representation changed incompatibly",
        ),
    }
}

/// Compare the wire domains two shapes accept.
///
/// Closed enums constrain the wire; open enums are advisory and accept
/// their full base domain. Integer is a subset of number.
fn type_transition(old: &NodeShape, new: &NodeShape) -> TypeTransition {
    use NodeShape::{Enum, Primitive};
    use PrimitiveKind::{Integer, Number};

    match (old, new) {
        // Gaining a closed constraint over the same base narrows; losing
        // one widens. (Value-set containment is irrelevant per the rule
        // table: closed→unconstrained is always a widening.)
        (
            Primitive { kind: old_kind },
            Enum {
                base, open: false, ..
            },
        ) if old_kind == base => TypeTransition::Narrowed,
        (
            Enum {
                base, open: false, ..
            },
            Primitive { kind: new_kind },
        ) if base == new_kind => TypeTransition::Widened,
        (
            Enum {
                base: old_base,
                open: true,
                ..
            },
            Enum {
                base: new_base,
                open: false,
                ..
            },
        ) if old_base == new_base => TypeTransition::Narrowed,
        (
            Enum {
                base: old_base,
                open: false,
                ..
            },
            Enum {
                base: new_base,
                open: true,
                ..
            },
        ) if old_base == new_base => TypeTransition::Widened,

        // Open enums accept their full base domain: swapping with the bare
        // base primitive changes nothing a consumer can observe
        (Primitive { kind }, Enum { base, open: true, .. }) if kind == base => {
            TypeTransition::Widened
        }
        (Enum { base, open: true, .. }, Primitive { kind }) if base == kind => {
            TypeTransition::Widened
        }

        // Numeric containment
        (Primitive { kind: Integer }, Primitive { kind: Number }) => TypeTransition::Widened,
        (Primitive { kind: Number }, Primitive { kind: Integer }) => TypeTransition::Narrowed,

        _ => TypeTransition::Incomparable,
    }
}
