//! Verdict rendering.
//!
//! The structured report is the serde-serializable `Verdict` itself; this
//! module only adds the human-readable rendering on top.

pub mod human_summary;

pub use human_summary::render_human_summary;
