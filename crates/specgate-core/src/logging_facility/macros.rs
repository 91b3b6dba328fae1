//! Canonical operation logging macros.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use specgate_core::log_op_start;
/// log_op_start!("check");
/// log_op_start!("check", snapshot_kind = "interface");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use specgate_core::log_op_end;
/// log_op_end!("check", duration_ms = 12);
/// log_op_end!("check", duration_ms = 12, change_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error with its stable kind and code
///
/// # Example
///
/// ```
/// # use specgate_core::log_op_error;
/// # use specgate_core::errors::{GateError, GateErrorKind};
/// let err = GateError::new(GateErrorKind::SnapshotMissing).with_op("check");
/// log_op_error!("check", err, duration_ms = 4);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::GateError;
        let gate_err: GateError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?gate_err.kind(),
            err_code = gate_err.kind().code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::GateError;
        let gate_err: GateError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = specgate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?gate_err.kind(),
            err_code = gate_err.kind().code(),
            $($field)*
        );
    }};
}
