//! Recursive schema type tree.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeMap`/`BTreeSet` for deterministic iteration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Primitive wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl PrimitiveKind {
    /// Canonical lowercase name as it appears in documents
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }
}

/// A named object field: child node plus required flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub node: SchemaNode,
    pub required: bool,
}

/// Recursive type tree node.
///
/// References are held by name and resolved lazily during traversal —
/// never eagerly inlined, since real interface descriptions contain
/// cyclic self-references (e.g. tree-shaped payloads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SchemaNode {
    /// Object with named fields; field names are unique by construction
    Object {
        fields: BTreeMap<String, Field>,
        description: Option<String>,
    },
    /// Homogeneous array
    Array { items: Box<SchemaNode> },
    /// Primitive leaf
    Primitive {
        kind: PrimitiveKind,
        description: Option<String>,
    },
    /// Constrained value set over a primitive base.
    ///
    /// `open: false` means the wire rejects unknown values (closed enum);
    /// `open: true` means membership is advisory only. The flag drives
    /// breaking-change classification.
    Enum {
        base: PrimitiveKind,
        values: BTreeSet<String>,
        open: bool,
        description: Option<String>,
    },
    /// Pointer to a named shared schema in the owning model
    Reference { name: String },
}

impl SchemaNode {
    /// Description attached at this node, if any
    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Object { description, .. }
            | SchemaNode::Primitive { description, .. }
            | SchemaNode::Enum { description, .. } => description.as_deref(),
            SchemaNode::Array { .. } | SchemaNode::Reference { .. } => None,
        }
    }
}
