//! Structural contract diffing.

pub mod engine;
pub mod model;

pub use engine::compute_diff;
pub use model::{Change, ChangeAspect, ChangeKind, ChangeLocation, ChangeScope, ChangeSnapshot};
