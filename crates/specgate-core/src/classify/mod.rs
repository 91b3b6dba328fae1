//! Compatibility classification of atomic changes.

pub mod classifier;
pub mod rules;

pub use classifier::{classify, classify_all};
pub use rules::{ClassifiedChange, CompatClass};
