//! Structured logging facility.
//!
//! One initialization point via `init(profile)` and three canonical
//! operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! emitting the stable field schema from `specgate_core_types::schema`.
//! Override tokens travel as `Sensitive` values and therefore can never
//! appear in a log line.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
