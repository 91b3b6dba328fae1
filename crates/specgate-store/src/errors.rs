//! Error helpers for specgate-store
//!
//! Wraps specgate-core GateError with store-specific constructors.

use specgate_core::errors::{GateError, GateErrorKind};

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> GateError {
    GateError::new(GateErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a corrupt-artifact error
pub fn snapshot_corrupt(location: &str, reason: impl Into<String>) -> GateError {
    GateError::new(GateErrorKind::SnapshotCorrupt)
        .with_op("load_snapshot")
        .with_location(location.to_string())
        .with_message(reason)
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> GateError {
    GateError::new(GateErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
