//! In-memory schema model for interface and event descriptions.
//!
//! Raw documents are parsed eagerly at this boundary into strongly-typed
//! structures; every downstream component (diff, classify, policy) operates
//! only on validated models, never on raw maps.

pub mod document;
pub mod node;
pub mod operation;
pub mod path;
pub mod walk;

pub use document::{DocumentKind, SchemaModel};
pub use node::{Field, PrimitiveKind, SchemaNode};
pub use operation::{Operation, OperationKey, ParamLocation, Parameter};
pub use path::{Direction, FieldPath};
pub use walk::{walk, NodeFacts, NodeShape};
