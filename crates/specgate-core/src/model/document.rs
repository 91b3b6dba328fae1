//! Document parsing into the schema model.
//!
//! Parsing is the strong-typing boundary: raw nested key-value documents
//! are validated eagerly and rejected immediately on any structural
//! inconsistency, so the diff engine never sees a partial model.
//!
//! ## Document layout
//!
//! Interface documents:
//!
//! ```json
//! {
//!   "kind": "interface",
//!   "title": "...", "version": "...",
//!   "schemas": { "Area": { "node": "object", ... } },
//!   "operations": [
//!     { "path": "/areas", "method": "GET",
//!       "parameters": [ { "name": "limit", "in": "query", "required": false,
//!                         "schema": { "type": "integer" } } ],
//!       "request": { ... },
//!       "responses": { "200": { "$ref": "Area" } } }
//!   ]
//! }
//! ```
//!
//! Event documents replace `operations` with `events`:
//!
//! ```json
//! { "kind": "event",
//!   "events": [ { "type": "provider.matched", "payload": { ... } } ] }
//! ```
//!
//! Schema nodes: `{"$ref": "Name"}`, `{"type": "object", "fields": {...},
//! "required": [...]}`, `{"type": "array", "items": {...}}`,
//! `{"type": "enum", "base": "string", "values": [...], "open": false}`,
//! or a bare primitive `{"type": "string"}`.

use crate::errors::{dangling_reference, malformed, GateError, GateErrorKind, Result};
use crate::model::node::{Field, PrimitiveKind, SchemaNode};
use crate::model::operation::{Operation, OperationKey, ParamLocation, Parameter};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

const OP: &str = "parse_document";

/// Which description format a model holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// HTTP interface description: operations keyed by (method, path)
    Interface,
    /// Event/webhook schemas: operations keyed by event type
    Event,
}

impl DocumentKind {
    /// Canonical `kind` field value in documents
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Interface => "interface",
            DocumentKind::Event => "event",
        }
    }
}

/// A fully-validated schema model for one snapshot side.
///
/// The model owns all named schemas; operations hold non-owning references
/// by name. Every reference name used anywhere in the model is guaranteed
/// to resolve (checked at parse time).
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaModel {
    kind: DocumentKind,
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    schemas: BTreeMap<String, SchemaNode>,
    operations: BTreeMap<OperationKey, Operation>,
}

impl SchemaModel {
    /// Parse and validate a raw document of the given kind.
    ///
    /// # Errors
    ///
    /// - `MalformedSchema` — the document violates the format (wrong types,
    ///   missing required keys, duplicate enum values, `required` naming an
    ///   absent field, duplicate operations)
    /// - `WrongDocumentKind` — the document declares a different kind
    /// - `ReferenceResolution` — a `$ref` does not resolve within the model
    pub fn parse(kind: DocumentKind, raw: &Value) -> Result<SchemaModel> {
        let obj = raw
            .as_object()
            .ok_or_else(|| malformed(OP, "", "document root must be an object"))?;

        let declared = obj
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(OP, "kind", "`kind` must be a string"))?;
        if declared != kind.name() {
            return Err(GateError::new(GateErrorKind::WrongDocumentKind)
                .with_op(OP)
                .with_message(format!(
                    "expected kind `{}`, document declares `{}`",
                    kind.name(),
                    declared
                )));
        }

        let title = optional_string(obj, "title")?;
        let version = optional_string(obj, "version")?;
        let description = optional_string(obj, "description")?;

        let mut schemas = BTreeMap::new();
        if let Some(raw_schemas) = obj.get("schemas") {
            let map = raw_schemas
                .as_object()
                .ok_or_else(|| malformed(OP, "schemas", "`schemas` must be an object"))?;
            for (name, node) in map {
                let location = format!("schemas/{}", name);
                schemas.insert(name.clone(), parse_node(node, &location)?);
            }
        }

        let operations = match kind {
            DocumentKind::Interface => parse_interface_operations(obj)?,
            DocumentKind::Event => parse_event_operations(obj)?,
        };

        let model = SchemaModel {
            kind,
            title,
            version,
            description,
            schemas,
            operations,
        };
        model.check_references()?;
        Ok(model)
    }

    /// The document kind this model was parsed as
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Ordered iteration over all operations
    pub fn list_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Ordered operation keys
    pub fn operation_keys(&self) -> impl Iterator<Item = &OperationKey> {
        self.operations.keys()
    }

    /// Look up one operation by key
    pub fn operation(&self, key: &OperationKey) -> Option<&Operation> {
        self.operations.get(key)
    }

    /// Resolve a named shared schema.
    ///
    /// # Errors
    ///
    /// `ReferenceResolution` if no schema of that name exists. Parse-time
    /// validation guarantees this never fires for names reachable from the
    /// model's own operations.
    pub fn resolve(&self, name: &str) -> Result<&SchemaNode> {
        self.schemas
            .get(name)
            .ok_or_else(|| dangling_reference("resolve", name, ""))
    }

    /// Verify that every reference in the model resolves (no dangling refs).
    fn check_references(&self) -> Result<()> {
        for (name, node) in &self.schemas {
            check_node_references(node, &self.schemas, &format!("schemas/{}", name))?;
        }
        for (key, op) in &self.operations {
            let location = key.to_string();
            for param in &op.parameters {
                check_node_references(&param.schema, &self.schemas, &location)?;
            }
            if let Some(request) = &op.request {
                check_node_references(request, &self.schemas, &location)?;
            }
            for node in op.responses.values() {
                check_node_references(node, &self.schemas, &location)?;
            }
        }
        Ok(())
    }
}

fn check_node_references(
    node: &SchemaNode,
    schemas: &BTreeMap<String, SchemaNode>,
    location: &str,
) -> Result<()> {
    match node {
        SchemaNode::Reference { name } => {
            if !schemas.contains_key(name) {
                return Err(dangling_reference(OP, name, location));
            }
            Ok(())
        }
        SchemaNode::Object { fields, .. } => {
            for (field_name, field) in fields {
                check_node_references(
                    &field.node,
                    schemas,
                    &format!("{}/{}", location, field_name),
                )?;
            }
            Ok(())
        }
        SchemaNode::Array { items } => check_node_references(items, schemas, location),
        SchemaNode::Primitive { .. } | SchemaNode::Enum { .. } => Ok(()),
    }
}

fn optional_string(obj: &serde_json::Map<String, Value>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(malformed(
            OP,
            key,
            format!("`{}` must be a string, got: {}", key, other),
        )),
    }
}

fn parse_interface_operations(
    obj: &serde_json::Map<String, Value>,
) -> Result<BTreeMap<OperationKey, Operation>> {
    let raw_ops = obj
        .get("operations")
        .ok_or_else(|| malformed(OP, "operations", "interface document requires `operations`"))?
        .as_array()
        .ok_or_else(|| malformed(OP, "operations", "`operations` must be an array"))?;

    let mut operations = BTreeMap::new();
    for (idx, raw_op) in raw_ops.iter().enumerate() {
        let location = format!("operations/{}", idx);
        let op_obj = raw_op
            .as_object()
            .ok_or_else(|| malformed(OP, &location, "operation must be an object"))?;

        let path = require_string(op_obj, "path", &location)?;
        if !path.starts_with('/') {
            return Err(malformed(
                OP,
                &location,
                format!("operation path must start with `/`, got `{}`", path),
            ));
        }
        let method = require_string(op_obj, "method", &location)?.to_uppercase();

        let key = OperationKey::Http { method, path };
        let operation = Operation {
            key: key.clone(),
            parameters: parse_parameters(op_obj, &location)?,
            request: match op_obj.get("request") {
                None | Some(Value::Null) => None,
                Some(node) => Some(parse_node(node, &format!("{}/request", location))?),
            },
            responses: parse_responses(op_obj, &location)?,
            description: optional_string(op_obj, "description")?,
        };

        if operations.insert(key.clone(), operation).is_some() {
            return Err(malformed(
                OP,
                &location,
                format!("duplicate operation `{}`", key),
            ));
        }
    }
    Ok(operations)
}

fn parse_event_operations(
    obj: &serde_json::Map<String, Value>,
) -> Result<BTreeMap<OperationKey, Operation>> {
    let raw_events = obj
        .get("events")
        .ok_or_else(|| malformed(OP, "events", "event document requires `events`"))?
        .as_array()
        .ok_or_else(|| malformed(OP, "events", "`events` must be an array"))?;

    let mut operations = BTreeMap::new();
    for (idx, raw_event) in raw_events.iter().enumerate() {
        let location = format!("events/{}", idx);
        let event_obj = raw_event
            .as_object()
            .ok_or_else(|| malformed(OP, &location, "event must be an object"))?;

        let event_type = require_string(event_obj, "type", &location)?;
        let payload = event_obj
            .get("payload")
            .ok_or_else(|| malformed(OP, &location, "event requires `payload`"))?;

        let key = OperationKey::Event { event_type };
        let operation = Operation {
            key: key.clone(),
            parameters: Vec::new(),
            request: Some(parse_node(payload, &format!("{}/payload", location))?),
            responses: BTreeMap::new(),
            description: optional_string(event_obj, "description")?,
        };

        if operations.insert(key.clone(), operation).is_some() {
            return Err(malformed(
                OP,
                &location,
                format!("duplicate event `{}`", key),
            ));
        }
    }
    Ok(operations)
}

fn require_string(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    location: &str,
) -> Result<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            malformed(
                OP,
                location,
                format!("required field `{}` is absent or not a string", key),
            )
        })
}

fn parse_parameters(
    op_obj: &serde_json::Map<String, Value>,
    location: &str,
) -> Result<Vec<Parameter>> {
    let raw_params = match op_obj.get("parameters") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v.as_array().ok_or_else(|| {
            malformed(OP, location, "`parameters` must be an array")
        })?,
    };

    let mut params = Vec::new();
    let mut seen = BTreeSet::new();
    for (idx, raw_param) in raw_params.iter().enumerate() {
        let param_location = format!("{}/parameters/{}", location, idx);
        let param_obj = raw_param
            .as_object()
            .ok_or_else(|| malformed(OP, &param_location, "parameter must be an object"))?;

        let name = require_string(param_obj, "name", &param_location)?;
        let loc = match require_string(param_obj, "in", &param_location)?.as_str() {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "header" => ParamLocation::Header,
            other => {
                return Err(malformed(
                    OP,
                    &param_location,
                    format!("parameter `in` must be path|query|header, got `{}`", other),
                ))
            }
        };
        if !seen.insert((loc.name(), name.clone())) {
            return Err(malformed(
                OP,
                &param_location,
                format!("duplicate parameter `{}` in `{}`", name, loc.name()),
            ));
        }

        let required = param_obj
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let schema = match param_obj.get("schema") {
            Some(node) => parse_node(node, &format!("{}/schema", param_location))?,
            None => SchemaNode::Primitive {
                kind: PrimitiveKind::String,
                description: None,
            },
        };

        params.push(Parameter {
            name,
            location: loc,
            required,
            schema,
        });
    }
    Ok(params)
}

fn parse_responses(
    op_obj: &serde_json::Map<String, Value>,
    location: &str,
) -> Result<BTreeMap<u16, SchemaNode>> {
    let raw_responses = match op_obj.get("responses") {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(v) => v.as_object().ok_or_else(|| {
            malformed(OP, location, "`responses` must be an object keyed by status")
        })?,
    };

    let mut responses = BTreeMap::new();
    for (status_key, node) in raw_responses {
        let response_location = format!("{}/responses/{}", location, status_key);
        let status: u16 = status_key.parse().map_err(|_| {
            malformed(
                OP,
                &response_location,
                format!("response status `{}` is not a number", status_key),
            )
        })?;
        if !(100..=599).contains(&status) {
            return Err(malformed(
                OP,
                &response_location,
                format!("response status {} out of range", status),
            ));
        }
        responses.insert(status, parse_node(node, &response_location)?);
    }
    Ok(responses)
}

/// Parse one schema node, recursively.
fn parse_node(raw: &Value, location: &str) -> Result<SchemaNode> {
    let obj = raw
        .as_object()
        .ok_or_else(|| malformed(OP, location, "schema node must be an object"))?;

    if let Some(reference) = obj.get("$ref") {
        let name = reference
            .as_str()
            .ok_or_else(|| malformed(OP, location, "`$ref` must be a string"))?;
        return Ok(SchemaNode::Reference {
            name: name.to_string(),
        });
    }

    let type_name = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(OP, location, "schema node requires `type` or `$ref`"))?;

    match type_name {
        "object" => parse_object_node(obj, location),
        "array" => {
            let items = obj
                .get("items")
                .ok_or_else(|| malformed(OP, location, "array node requires `items`"))?;
            Ok(SchemaNode::Array {
                items: Box::new(parse_node(items, &format!("{}/items", location))?),
            })
        }
        "enum" => parse_enum_node(obj, location),
        "string" | "integer" | "number" | "boolean" => Ok(SchemaNode::Primitive {
            kind: parse_primitive(type_name, location)?,
            description: optional_string(obj, "description")?,
        }),
        other => Err(malformed(
            OP,
            location,
            format!("unknown schema node type `{}`", other),
        )),
    }
}

fn parse_object_node(obj: &serde_json::Map<String, Value>, location: &str) -> Result<SchemaNode> {
    let raw_fields = match obj.get("fields") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_object().ok_or_else(|| {
            malformed(OP, location, "object `fields` must be an object")
        })?),
    };

    let mut required_names = BTreeSet::new();
    if let Some(raw_required) = obj.get("required") {
        let list = raw_required
            .as_array()
            .ok_or_else(|| malformed(OP, location, "`required` must be an array"))?;
        for entry in list {
            let name = entry
                .as_str()
                .ok_or_else(|| malformed(OP, location, "`required` entries must be strings"))?;
            required_names.insert(name.to_string());
        }
    }

    let mut fields = BTreeMap::new();
    if let Some(raw_fields) = raw_fields {
        for (name, raw_field) in raw_fields {
            let node = parse_node(raw_field, &format!("{}/{}", location, name))?;
            fields.insert(
                name.clone(),
                Field {
                    node,
                    required: required_names.contains(name),
                },
            );
        }
    }

    // Every `required` entry must name a declared field
    for name in &required_names {
        if !fields.contains_key(name) {
            return Err(malformed(
                OP,
                location,
                format!("`required` names absent field `{}`", name),
            ));
        }
    }

    Ok(SchemaNode::Object {
        fields,
        description: optional_string(obj, "description")?,
    })
}

fn parse_enum_node(obj: &serde_json::Map<String, Value>, location: &str) -> Result<SchemaNode> {
    let base = match obj.get("base") {
        None => PrimitiveKind::String,
        Some(v) => {
            let name = v
                .as_str()
                .ok_or_else(|| malformed(OP, location, "enum `base` must be a string"))?;
            parse_primitive(name, location)?
        }
    };

    let raw_values = obj
        .get("values")
        .ok_or_else(|| malformed(OP, location, "enum node requires `values`"))?
        .as_array()
        .ok_or_else(|| malformed(OP, location, "enum `values` must be an array"))?;

    let mut values = BTreeSet::new();
    for raw_value in raw_values {
        let literal = match raw_value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(malformed(
                    OP,
                    location,
                    format!("enum values must be string or number literals, got: {}", other),
                ))
            }
        };
        if !values.insert(literal.clone()) {
            return Err(malformed(
                OP,
                location,
                format!("duplicate enum value `{}`", literal),
            ));
        }
    }

    let open = obj.get("open").and_then(Value::as_bool).unwrap_or(false);

    Ok(SchemaNode::Enum {
        base,
        values,
        open,
        description: optional_string(obj, "description")?,
    })
}

fn parse_primitive(name: &str, location: &str) -> Result<PrimitiveKind> {
    match name {
        "string" => Ok(PrimitiveKind::String),
        "integer" => Ok(PrimitiveKind::Integer),
        "number" => Ok(PrimitiveKind::Number),
        "boolean" => Ok(PrimitiveKind::Boolean),
        other => Err(malformed(
            OP,
            location,
            format!("unknown primitive type `{}`", other),
        )),
    }
}
