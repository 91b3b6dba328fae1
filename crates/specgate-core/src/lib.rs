//! Specgate Core - Contract model, diff, classification, and policy kernel
//!
//! This crate provides the foundational pieces of the contract gate:
//! - Schema model for interface and event documents with eager validation
//! - Canonical field-path traversal with reference cycle cutting
//! - Deterministic structural diff between two models of the same kind
//! - Total classification of changes into compatibility classes
//! - Pure policy enforcement producing an auditable verdict
//! - Human-readable report rendering
//!
//! Snapshot persistence and pipeline orchestration live in separate crates.

pub mod classify;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod report;

// Re-export commonly used types
pub use classify::{classify, classify_all, ClassifiedChange, CompatClass};
pub use diff::{compute_diff, Change, ChangeKind};
pub use errors::{GateError, GateErrorKind, Result};
pub use model::{DocumentKind, SchemaModel};
pub use policy::{enforce, AggregationMode, PolicyConfig, Verdict};
pub use report::render_human_summary;
