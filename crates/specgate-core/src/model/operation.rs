//! Operations and their stable identity.

use crate::model::node::SchemaNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable operation identity across snapshots.
///
/// Interface operations are keyed by (method, path); event operations by
/// event type. Reordering or restructuring of the source document never
/// changes an operation's key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationKey {
    Http { method: String, path: String },
    Event { event_type: String },
}

impl OperationKey {
    /// The surface path used for policy exemption matching: the URL path
    /// for HTTP operations, the event type for event operations.
    pub fn surface_path(&self) -> &str {
        match self {
            OperationKey::Http { path, .. } => path,
            OperationKey::Event { event_type } => event_type,
        }
    }

    /// True for HTTP interface operations
    pub fn is_http(&self) -> bool {
        matches!(self, OperationKey::Http { .. })
    }
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKey::Http { method, path } => write!(f, "{} {}", method, path),
            OperationKey::Event { event_type } => write!(f, "event:{}", event_type),
        }
    }
}

/// Where a parameter is carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

impl ParamLocation {
    pub fn name(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
        }
    }
}

/// A single operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

/// One operation of a schema model.
///
/// Event operations carry their payload as the request node and have no
/// responses; the envelope/payload split is handled at the snapshot-kind
/// level, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub key: OperationKey,
    /// Declared order is preserved; order-only changes are reported as
    /// reorder changes with no compatibility impact.
    pub parameters: Vec<Parameter>,
    pub request: Option<SchemaNode>,
    pub responses: BTreeMap<u16, SchemaNode>,
    pub description: Option<String>,
}
