//! Specgate Pipeline - Orchestration of the contract gate
//!
//! Sequences snapshot loading, parsing, diffing, classification, and
//! enforcement, and owns the exit-status contract with the CI wrapper.
//! The snapshot store is an injected dependency so the whole pipeline
//! runs against in-memory fixtures in tests.

pub mod check;
pub mod config;
pub mod generate;
pub mod inputs;
pub mod status;

pub use check::{run_check, CheckOutcome, KindReport, ScopedVerdict, VerdictScope};
pub use config::{ConfigError, GateConfigFile};
pub use generate::{run_generate, GenerateOutcome};
pub use inputs::RunInputs;
pub use status::ExitStatus;
