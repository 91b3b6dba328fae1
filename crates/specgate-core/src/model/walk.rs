//! Ordered traversal of every field position reachable from an operation.
//!
//! `walk` flattens an operation into `(FieldPath, NodeFacts)` pairs:
//! parameters under `request/param/{in}/{name}`, the request body under
//! `request/body`, each response body under `response/{status}/body`.
//! References are resolved lazily; a per-path visited set terminates on
//! cyclic references by recording a `Reference` fact and stopping.

use crate::errors::Result;
use crate::model::document::SchemaModel;
use crate::model::node::{PrimitiveKind, SchemaNode};
use crate::model::operation::Operation;
use crate::model::path::{FieldPath, ARRAY_SEGMENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structural shape of one field position, with everything classification
/// needs and nothing more. Object/array interiors are carried by child
/// paths, not by the shape itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum NodeShape {
    Object,
    Array,
    Primitive {
        kind: PrimitiveKind,
    },
    Enum {
        base: PrimitiveKind,
        values: BTreeSet<String>,
        open: bool,
    },
    /// Cycle cut: a reference already being traversed on this path
    Reference {
        name: String,
    },
}

/// Facts recorded at one field position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFacts {
    pub shape: NodeShape,
    /// Whether the position is required by its parent (parameter flag,
    /// object `required` membership; array elements and roots are required)
    pub required: bool,
    pub description: Option<String>,
}

/// Flatten an operation into its ordered field positions.
///
/// # Errors
///
/// `ReferenceResolution` if a reference fails to resolve; parse-time
/// validation makes this unreachable for models built via
/// [`SchemaModel::parse`].
pub fn walk(model: &SchemaModel, op: &Operation) -> Result<Vec<(FieldPath, NodeFacts)>> {
    let mut out = Vec::new();

    for param in &op.parameters {
        let path = FieldPath::from_segments([
            "request",
            "param",
            param.location.name(),
            param.name.as_str(),
        ]);
        let mut visited = Vec::new();
        visit(
            model,
            &param.schema,
            path,
            param.required,
            &mut visited,
            &mut out,
        )?;
    }

    if let Some(request) = &op.request {
        let path = FieldPath::from_segments(["request", "body"]);
        let mut visited = Vec::new();
        visit(model, request, path, true, &mut visited, &mut out)?;
    }

    for (status, node) in &op.responses {
        let path = FieldPath::from_segments(["response", &status.to_string(), "body"]);
        let mut visited = Vec::new();
        visit(model, node, path, true, &mut visited, &mut out)?;
    }

    Ok(out)
}

fn visit(
    model: &SchemaModel,
    node: &SchemaNode,
    path: FieldPath,
    required: bool,
    visited: &mut Vec<String>,
    out: &mut Vec<(FieldPath, NodeFacts)>,
) -> Result<()> {
    match node {
        SchemaNode::Reference { name } => {
            if visited.iter().any(|seen| seen == name) {
                // Cycle: record the reference identity and stop descending
                out.push((
                    path,
                    NodeFacts {
                        shape: NodeShape::Reference { name: name.clone() },
                        required,
                        description: None,
                    },
                ));
                return Ok(());
            }
            let resolved = model.resolve(name)?;
            visited.push(name.clone());
            visit(model, resolved, path, required, visited, out)?;
            visited.pop();
            Ok(())
        }
        SchemaNode::Object {
            fields,
            description,
        } => {
            out.push((
                path.clone(),
                NodeFacts {
                    shape: NodeShape::Object,
                    required,
                    description: description.clone(),
                },
            ));
            for (name, field) in fields {
                visit(
                    model,
                    &field.node,
                    path.child(name),
                    field.required,
                    visited,
                    out,
                )?;
            }
            Ok(())
        }
        SchemaNode::Array { items } => {
            out.push((
                path.clone(),
                NodeFacts {
                    shape: NodeShape::Array,
                    required,
                    description: None,
                },
            ));
            visit(model, items, path.child(ARRAY_SEGMENT), true, visited, out)
        }
        SchemaNode::Primitive { kind, description } => {
            out.push((
                path,
                NodeFacts {
                    shape: NodeShape::Primitive { kind: *kind },
                    required,
                    description: description.clone(),
                },
            ));
            Ok(())
        }
        SchemaNode::Enum {
            base,
            values,
            open,
            description,
        } => {
            out.push((
                path,
                NodeFacts {
                    shape: NodeShape::Enum {
                        base: *base,
                        values: values.clone(),
                        open: *open,
                    },
                    required,
                    description: description.clone(),
                },
            ));
            Ok(())
        }
    }
}
