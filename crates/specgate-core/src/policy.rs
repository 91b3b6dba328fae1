//! Policy enforcement over classified changes.
//!
//! `enforce` is pure: same changes plus same config produce the same
//! verdict, with no clock, filesystem, or environment access. Token
//! resolution from the environment happens upstream; by the time a config
//! reaches this module the token is just an opaque [`Sensitive`] value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use specgate_core_types::Sensitive;

use crate::classify::{ClassifiedChange, CompatClass};
use crate::errors::{GateError, GateErrorKind, Result};

/// How enforcement joins the change sets of multiple snapshot kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// One enforcement over the merged change set of all kinds
    Aggregate,
    /// Independent enforcement per kind; overall pass requires every kind
    /// to pass
    PerKind,
}

/// Enforcement configuration, immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Tolerate breaking changes up to `max_breaking` without an override
    pub allow_breaking: bool,
    /// Breaking changes always need a valid override token, even when
    /// `allow_breaking` is set
    pub require_override: bool,
    /// Ceiling on tolerated breaking changes when `allow_breaking` is set
    pub max_breaking: u32,
    /// Operation path prefixes whose changes are exempt from enforcement
    pub path_exemptions: BTreeSet<String>,
    /// When non-empty, only HTTP operations under these prefixes are
    /// enforced; everything else is implicitly internal
    pub public_path_prefixes: BTreeSet<String>,
    pub aggregation: AggregationMode,
    /// Override token as supplied by the caller, if any. Never logged.
    pub override_token: Option<Sensitive<String>>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_breaking: false,
            require_override: false,
            max_breaking: 0,
            path_exemptions: BTreeSet::new(),
            public_path_prefixes: BTreeSet::new(),
            aggregation: AggregationMode::Aggregate,
            override_token: None,
        }
    }
}

/// A classified change plus its enforcement-time exemption flag.
///
/// Exemption never reclassifies: an exempted breaking change still reads
/// `Breaking` here, it just does not count toward the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub classified: ClassifiedChange,
    pub exempted: bool,
}

/// Outcome of one enforcement pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    /// Non-exempted breaking changes
    pub breaking_count: u32,
    pub additive_count: u32,
    pub informational_count: u32,
    pub exempted_count: u32,
    pub override_applied: bool,
    /// Every observed change, exempted or not
    pub report: Vec<ReportEntry>,
}

impl Verdict {
    /// A verdict over zero changes
    pub fn empty() -> Self {
        Self {
            passed: true,
            breaking_count: 0,
            additive_count: 0,
            informational_count: 0,
            exempted_count: 0,
            override_applied: false,
            report: Vec::new(),
        }
    }
}

/// Structural validity check for a supplied override token.
///
/// A token that is present but invalid is a hard error, never silently
/// downgraded to "no override": the caller asserted intent to override and
/// a typo must not turn that into a plain policy failure.
pub fn validate_override_token(token: &Sensitive<String>) -> Result<()> {
    let value = token.expose();
    if value.trim().is_empty() {
        return Err(invalid_override("token is blank"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid_override("token contains whitespace"));
    }
    if value.chars().count() < 8 {
        return Err(invalid_override("token is shorter than 8 characters"));
    }
    Ok(())
}

fn invalid_override(reason: &str) -> GateError {
    // Only the structural reason is reported; the token value itself never
    // enters the error.
    GateError::new(GateErrorKind::InvalidOverride)
        .with_op("enforce")
        .with_message(format!("override token rejected: {}", reason))
}

/// Apply a policy to a classified change set.
///
/// # Errors
///
/// Returns `InvalidOverride` when a token is supplied but structurally
/// invalid. All other outcomes, including failure, are expressed in the
/// verdict.
pub fn enforce(changes: &[ClassifiedChange], config: &PolicyConfig) -> Result<Verdict> {
    // Validate eagerly so a bad token fails even a clean run.
    let override_supplied = match &config.override_token {
        Some(token) => {
            validate_override_token(token)?;
            true
        }
        None => false,
    };

    let mut verdict = Verdict::empty();
    for classified in changes {
        let exempted = is_exempted(classified, config);
        if exempted {
            verdict.exempted_count += 1;
        } else {
            match classified.class {
                CompatClass::Breaking => verdict.breaking_count += 1,
                CompatClass::Additive => verdict.additive_count += 1,
                CompatClass::Informational => verdict.informational_count += 1,
            }
        }
        verdict.report.push(ReportEntry {
            classified: classified.clone(),
            exempted,
        });
    }

    if verdict.breaking_count == 0 {
        verdict.passed = true;
    } else if override_supplied {
        verdict.passed = true;
        verdict.override_applied = true;
    } else if config.allow_breaking
        && !config.require_override
        && verdict.breaking_count <= config.max_breaking
    {
        verdict.passed = true;
    } else {
        verdict.passed = false;
    }

    Ok(verdict)
}

/// Whether a change is waived by path exemption.
///
/// Document-scoped changes are never exempted; they carry no operation
/// path to match against.
fn is_exempted(classified: &ClassifiedChange, config: &PolicyConfig) -> bool {
    let Some(key) = classified.change.location.operation_key() else {
        return false;
    };
    let surface = key.surface_path();

    if config
        .path_exemptions
        .iter()
        .any(|prefix| surface.starts_with(prefix.as_str()))
    {
        return true;
    }

    // A non-empty public surface list inverts the default: HTTP paths
    // outside it are internal. Event operations have no HTTP path and stay
    // enforced.
    if !config.public_path_prefixes.is_empty()
        && key.is_http()
        && !config
            .public_path_prefixes
            .iter()
            .any(|prefix| surface.starts_with(prefix.as_str()))
    {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Change, ChangeKind, ChangeLocation};
    use crate::model::{FieldPath, OperationKey};

    fn breaking_at(path: &str) -> ClassifiedChange {
        let key = OperationKey::Http {
            method: "GET".to_string(),
            path: path.to_string(),
        };
        let change = Change::new(
            ChangeLocation::operation(key, FieldPath::root()),
            ChangeKind::Removed,
            None,
            None,
            None,
        );
        ClassifiedChange::new(
            change,
            CompatClass::Breaking,
            crate::classify::rules::RULE_OP_REMOVED,
            "removed",
        )
    }

    fn additive_at(path: &str) -> ClassifiedChange {
        let key = OperationKey::Http {
            method: "GET".to_string(),
            path: path.to_string(),
        };
        let change = Change::new(
            ChangeLocation::operation(key, FieldPath::root()),
            ChangeKind::Added,
            None,
            None,
            None,
        );
        ClassifiedChange::new(
            change,
            CompatClass::Additive,
            crate::classify::rules::RULE_OP_ADDED,
            "added",
        )
    }

    fn token(value: &str) -> Sensitive<String> {
        Sensitive::new(value.to_string())
    }

    #[test]
    fn test_clean_change_set_passes() {
        let verdict = enforce(&[additive_at("/areas")], &PolicyConfig::default()).unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.additive_count, 1);
        assert_eq!(verdict.breaking_count, 0);
        assert!(!verdict.override_applied);
    }

    #[test]
    fn test_breaking_change_fails_default_policy() {
        let verdict = enforce(&[breaking_at("/areas")], &PolicyConfig::default()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.breaking_count, 1);
    }

    #[test]
    fn test_exempted_breaking_change_passes() {
        let config = PolicyConfig {
            path_exemptions: BTreeSet::from(["/internal/".to_string()]),
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[breaking_at("/internal/jobs")], &config).unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.breaking_count, 0);
        assert_eq!(verdict.exempted_count, 1);
        // Exemption keeps the entry in the report, flagged and with its
        // true class intact.
        assert_eq!(verdict.report.len(), 1);
        assert!(verdict.report[0].exempted);
        assert_eq!(verdict.report[0].classified.class, CompatClass::Breaking);
    }

    #[test]
    fn test_public_prefix_list_exempts_everything_else() {
        let config = PolicyConfig {
            public_path_prefixes: BTreeSet::from(["/v1/".to_string()]),
            ..PolicyConfig::default()
        };
        let verdict = enforce(
            &[breaking_at("/v1/areas"), breaking_at("/admin/flags")],
            &config,
        )
        .unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.breaking_count, 1);
        assert_eq!(verdict.exempted_count, 1);
    }

    #[test]
    fn test_event_operations_ignore_public_prefixes() {
        let key = OperationKey::Event {
            event_type: "provider.matched".to_string(),
        };
        let change = Change::new(
            ChangeLocation::operation(key, FieldPath::root()),
            ChangeKind::Removed,
            None,
            None,
            None,
        );
        let classified = ClassifiedChange::new(
            change,
            CompatClass::Breaking,
            crate::classify::rules::RULE_OP_REMOVED,
            "removed",
        );
        let config = PolicyConfig {
            public_path_prefixes: BTreeSet::from(["/v1/".to_string()]),
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[classified], &config).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.breaking_count, 1);
    }

    #[test]
    fn test_valid_override_passes_breaking() {
        let config = PolicyConfig {
            override_token: Some(token("release-2026-08")),
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[breaking_at("/areas")], &config).unwrap();
        assert!(verdict.passed);
        assert!(verdict.override_applied);
        assert_eq!(verdict.breaking_count, 1);
        assert_eq!(verdict.report.len(), 1);
    }

    #[test]
    fn test_override_on_clean_run_is_not_applied() {
        let config = PolicyConfig {
            override_token: Some(token("release-2026-08")),
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[additive_at("/areas")], &config).unwrap();
        assert!(verdict.passed);
        assert!(!verdict.override_applied);
    }

    #[test]
    fn test_invalid_override_is_fatal_even_on_clean_run() {
        let config = PolicyConfig {
            override_token: Some(token("short")),
            ..PolicyConfig::default()
        };
        let err = enforce(&[], &config).unwrap_err();
        assert_eq!(err.kind(), GateErrorKind::InvalidOverride);
    }

    #[test]
    fn test_blank_and_whitespace_tokens_are_rejected() {
        for bad in ["", "   ", "two words!", "tab\there"] {
            let err = validate_override_token(&token(bad)).unwrap_err();
            assert_eq!(err.kind(), GateErrorKind::InvalidOverride, "token {:?}", bad);
        }
    }

    #[test]
    fn test_invalid_override_error_never_contains_token() {
        let err = validate_override_token(&token("secret!")).unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_allow_breaking_within_budget_passes() {
        let config = PolicyConfig {
            allow_breaking: true,
            max_breaking: 2,
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[breaking_at("/a"), breaking_at("/b")], &config).unwrap();
        assert!(verdict.passed);
        assert!(!verdict.override_applied);
    }

    #[test]
    fn test_allow_breaking_over_budget_fails() {
        let config = PolicyConfig {
            allow_breaking: true,
            max_breaking: 1,
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[breaking_at("/a"), breaking_at("/b")], &config).unwrap();
        assert!(!verdict.passed);
    }

    #[test]
    fn test_require_override_defeats_allow_breaking() {
        let config = PolicyConfig {
            allow_breaking: true,
            max_breaking: 10,
            require_override: true,
            ..PolicyConfig::default()
        };
        let verdict = enforce(&[breaking_at("/a")], &config).unwrap();
        assert!(!verdict.passed);

        let with_token = PolicyConfig {
            override_token: Some(token("release-2026-08")),
            ..config
        };
        let verdict = enforce(&[breaking_at("/a")], &with_token).unwrap();
        assert!(verdict.passed);
        assert!(verdict.override_applied);
    }

    #[test]
    fn test_empty_change_set_passes() {
        let verdict = enforce(&[], &PolicyConfig::default()).unwrap();
        assert_eq!(verdict, Verdict::empty());
    }
}
