//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! A `Change` is immutable once emitted: created by the diff engine,
//! consumed by the classifier, never mutated afterward.

use crate::model::{FieldPath, NodeFacts, OperationKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// What happened at a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Present only in the new model
    Added,
    /// Present only in the old model
    Removed,
    /// Present in both with a structural difference
    Modified,
    /// Order-only difference with no wire effect
    ReorderedIrrelevant,
}

/// Which aspect of a position a `Modified` change concerns.
///
/// A type change and a requiredness change at the same path in the same
/// diff are two separate records; policies may tolerate one but not the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAspect {
    /// Shape changed (kind, enum openness, primitive kind)
    Type,
    /// Required flag flipped
    Requiredness,
    /// Enum value set changed with shape otherwise identical
    EnumValues,
    /// Cycle-cut reference points at a different named schema
    ReferenceTarget,
    /// Description/title/version only; no structural effect
    Metadata,
}

/// Whether a change sits on an operation or on the document itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope")]
pub enum ChangeScope {
    Document,
    Operation { key: OperationKey },
}

/// Where a change was observed: scope plus canonical field path
/// (empty path = the operation root)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLocation {
    pub scope: ChangeScope,
    pub path: FieldPath,
}

impl ChangeLocation {
    pub fn document(path: FieldPath) -> Self {
        Self {
            scope: ChangeScope::Document,
            path,
        }
    }

    pub fn operation(key: OperationKey, path: FieldPath) -> Self {
        Self {
            scope: ChangeScope::Operation { key },
            path,
        }
    }

    /// The operation key, when scoped to one
    pub fn operation_key(&self) -> Option<&OperationKey> {
        match &self.scope {
            ChangeScope::Operation { key } => Some(key),
            ChangeScope::Document => None,
        }
    }
}

impl std::fmt::Display for ChangeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            ChangeScope::Document => write!(f, "document")?,
            ChangeScope::Operation { key } => write!(f, "{}", key)?,
        }
        if !self.path.is_root() {
            write!(f, " :: {}", self.path)?;
        }
        Ok(())
    }
}

/// Old/new state carried on a change record.
///
/// Adjacently tagged: the internally-tagged form cannot represent the
/// `Text` newtype variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "snapshot", content = "value")]
pub enum ChangeSnapshot {
    /// Facts at a field position
    Node(NodeFacts),
    /// Summary of an entire operation (for operation-root changes)
    Operation {
        parameter_count: usize,
        response_statuses: Vec<u16>,
        has_request: bool,
    },
    /// Plain text (metadata values, orderings)
    Text(String),
}

/// One atomic observed difference between two schema models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Stable id derived from location, kind, and aspect; identical inputs
    /// always produce identical ids
    pub change_id: String,
    pub location: ChangeLocation,
    pub kind: ChangeKind,
    /// Populated for `Modified` changes only
    pub aspect: Option<ChangeAspect>,
    pub before: Option<ChangeSnapshot>,
    pub after: Option<ChangeSnapshot>,
}

impl Change {
    /// Construct a change with its deterministic id
    pub fn new(
        location: ChangeLocation,
        kind: ChangeKind,
        aspect: Option<ChangeAspect>,
        before: Option<ChangeSnapshot>,
        after: Option<ChangeSnapshot>,
    ) -> Self {
        let change_id = compute_change_id(&location, kind, aspect);
        Self {
            change_id,
            location,
            kind,
            aspect,
            before,
            after,
        }
    }
}

fn compute_change_id(
    location: &ChangeLocation,
    kind: ChangeKind,
    aspect: Option<ChangeAspect>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(location.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(format!("{:?}", kind).as_bytes());
    hasher.update(b"|");
    hasher.update(format!("{:?}", aspect).as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("chg-{}", &digest[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldPath;

    fn http_key() -> OperationKey {
        OperationKey::Http {
            method: "GET".to_string(),
            path: "/areas".to_string(),
        }
    }

    #[test]
    fn test_change_id_is_stable() {
        let location = ChangeLocation::operation(
            http_key(),
            FieldPath::from_segments(["response", "200", "body", "count"]),
        );
        let a = Change::new(location.clone(), ChangeKind::Removed, None, None, None);
        let b = Change::new(location, ChangeKind::Removed, None, None, None);
        assert_eq!(a.change_id, b.change_id);
        assert!(a.change_id.starts_with("chg-"));
    }

    #[test]
    fn test_change_id_distinguishes_aspects() {
        let location = ChangeLocation::operation(
            http_key(),
            FieldPath::from_segments(["request", "body", "status"]),
        );
        let type_change = Change::new(
            location.clone(),
            ChangeKind::Modified,
            Some(ChangeAspect::Type),
            None,
            None,
        );
        let required_change = Change::new(
            location,
            ChangeKind::Modified,
            Some(ChangeAspect::Requiredness),
            None,
            None,
        );
        assert_ne!(type_change.change_id, required_change.change_id);
    }

    #[test]
    fn test_change_with_text_snapshots_round_trips() {
        let change = Change::new(
            ChangeLocation::document(FieldPath::from_segments(["meta", "title"])),
            ChangeKind::Modified,
            Some(ChangeAspect::Metadata),
            Some(ChangeSnapshot::Text("v1".to_string())),
            Some(ChangeSnapshot::Text("v2".to_string())),
        );
        let serialized = serde_json::to_string(&change).unwrap();
        let reparsed: Change = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed, change);
    }

    #[test]
    fn test_location_display() {
        let root = ChangeLocation::operation(http_key(), FieldPath::root());
        assert_eq!(root.to_string(), "GET /areas");

        let nested = ChangeLocation::operation(
            http_key(),
            FieldPath::from_segments(["response", "200", "body", "count"]),
        );
        assert_eq!(nested.to_string(), "GET /areas :: response/200/body/count");

        let doc = ChangeLocation::document(FieldPath::from_segments(["meta", "title"]));
        assert_eq!(doc.to_string(), "document :: meta/title");
    }
}
