//! Classification rule identities and output types.
//!
//! Every rule firing is auditable: the rule id is stable across releases
//! and the rationale explains the compatibility reasoning in one sentence.

use crate::diff::model::Change;
use serde::{Deserialize, Serialize};

/// Compatibility impact of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompatClass {
    /// Can cause a conformant existing consumer to fail
    Breaking,
    /// Cannot invalidate any existing conformant consumer
    Additive,
    /// No structural effect on the wire
    Informational,
}

// Stable rule ids. Renaming one is itself a breaking change for report
// consumers, so these never change.
pub const RULE_OP_REMOVED: &str = "OP-REMOVED";
pub const RULE_OP_ADDED: &str = "OP-ADDED";
pub const RULE_REQ_ADD_REQUIRED: &str = "REQ-ADD-REQUIRED";
pub const RULE_REQ_ADD_OPTIONAL: &str = "REQ-ADD-OPTIONAL";
pub const RULE_REQ_REMOVED: &str = "REQ-REMOVED";
pub const RULE_RESP_ADDED: &str = "RESP-ADDED";
pub const RULE_RESP_REMOVED: &str = "RESP-REMOVED";
pub const RULE_TYPE_NARROWED: &str = "TYPE-NARROWED";
pub const RULE_TYPE_WIDENED: &str = "TYPE-WIDENED";
pub const RULE_TYPE_CHANGED: &str = "TYPE-CHANGED";
pub const RULE_ENUM_CLOSED_REMOVED: &str = "ENUM-CLOSED-REMOVED";
pub const RULE_ENUM_CLOSED_ADDED: &str = "ENUM-CLOSED-ADDED";
pub const RULE_ENUM_OPEN_VALUES: &str = "ENUM-OPEN-VALUES";
pub const RULE_OPTIONAL_TO_REQUIRED: &str = "OPTIONAL-TO-REQUIRED";
pub const RULE_REQUIRED_TO_OPTIONAL: &str = "REQUIRED-TO-OPTIONAL";
pub const RULE_REF_TARGET: &str = "REF-TARGET";
pub const RULE_METADATA: &str = "METADATA";
pub const RULE_REORDERED: &str = "REORDERED";

/// A change with its compatibility class and the rule that assigned it.
///
/// Classification never consults policy exemptions; the class recorded
/// here is always the true one, even for changes a policy later waives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    pub change: Change,
    pub class: CompatClass,
    pub rule_id: String,
    pub rationale: String,
}

impl ClassifiedChange {
    pub fn new(
        change: Change,
        class: CompatClass,
        rule_id: &'static str,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            change,
            class,
            rule_id: rule_id.to_string(),
            rationale: rationale.into(),
        }
    }
}
