//! End-to-end gate scenarios over in-memory fixture stores.

use serde_json::{json, Value};
use specgate_core::policy::PolicyConfig;
use specgate_core::CompatClass;
use specgate_pipeline::{run_check, ExitStatus, GateConfigFile, RunInputs};
use specgate_store::{MemorySnapshotStore, SnapshotArtifact, SnapshotKind};

fn areas_doc(response_fields: Value, required: Value) -> Value {
    json!({
        "kind": "interface",
        "operations": [
            { "path": "/areas", "method": "GET",
              "responses": { "200": { "type": "object",
                                      "fields": response_fields,
                                      "required": required } } }
        ]
    })
}

fn check_one(
    old: Value,
    new: Value,
    policy: &PolicyConfig,
) -> specgate_pipeline::CheckOutcome {
    let store = MemorySnapshotStore::new()
        .with_artifact(SnapshotArtifact::new(SnapshotKind::Interface, old));
    let inputs = RunInputs::new().with_document(SnapshotKind::Interface, new);
    run_check(&inputs, &store, policy)
}

#[test]
fn test_removed_response_field_fails_the_gate() {
    let old = areas_doc(json!({ "count": { "type": "integer" } }), json!(["count"]));
    let new = areas_doc(json!({}), json!([]));

    let outcome = check_one(old, new, &PolicyConfig::default());

    assert_eq!(outcome.status, ExitStatus::PolicyFail);
    let verdict = &outcome.verdicts[0].verdict;
    assert!(!verdict.passed);
    assert_eq!(verdict.breaking_count, 1);
    assert_eq!(verdict.report.len(), 1);
    assert_eq!(verdict.report[0].classified.rule_id, "RESP-REMOVED");
}

#[test]
fn test_added_operation_passes_the_gate() {
    let old = json!({ "kind": "interface", "operations": [] });
    let new = json!({
        "kind": "interface",
        "operations": [ { "path": "/templates", "method": "POST" } ]
    });

    let outcome = check_one(old, new, &PolicyConfig::default());

    assert_eq!(outcome.status, ExitStatus::Pass);
    let verdict = &outcome.verdicts[0].verdict;
    assert_eq!(verdict.additive_count, 1);
    assert_eq!(verdict.report[0].classified.rule_id, "OP-ADDED");
}

#[test]
fn test_closed_enum_value_added_passes() {
    let old = areas_doc(
        json!({ "status": { "type": "enum", "values": ["active", "locked"] } }),
        json!([]),
    );
    let new = areas_doc(
        json!({ "status": { "type": "enum", "values": ["active", "locked", "pending"] } }),
        json!([]),
    );

    let outcome = check_one(old, new, &PolicyConfig::default());

    assert_eq!(outcome.status, ExitStatus::Pass);
    let verdict = &outcome.verdicts[0].verdict;
    assert_eq!(verdict.additive_count, 1);
    assert_eq!(verdict.report[0].classified.rule_id, "ENUM-CLOSED-ADDED");
}

#[test]
fn test_closed_enum_value_removed_fails() {
    let old = areas_doc(
        json!({ "status": { "type": "enum", "values": ["active", "locked"] } }),
        json!([]),
    );
    let new = areas_doc(
        json!({ "status": { "type": "enum", "values": ["active"] } }),
        json!([]),
    );

    let outcome = check_one(old, new, &PolicyConfig::default());

    assert_eq!(outcome.status, ExitStatus::PolicyFail);
    let verdict = &outcome.verdicts[0].verdict;
    assert_eq!(verdict.breaking_count, 1);
    assert_eq!(verdict.report[0].classified.rule_id, "ENUM-CLOSED-REMOVED");
}

#[test]
fn test_exempted_path_passes_without_reclassifying() {
    let old = areas_doc(json!({ "count": { "type": "integer" } }), json!(["count"]));
    let new = areas_doc(json!({}), json!([]));

    let config = GateConfigFile::from_yaml("internal_only_paths: [\"/areas\"]").unwrap();
    let outcome = check_one(old, new, &config.resolve(|_| None));

    assert_eq!(outcome.status, ExitStatus::Pass);
    let verdict = &outcome.verdicts[0].verdict;
    assert_eq!(verdict.exempted_count, 1);
    assert_eq!(verdict.breaking_count, 0);
    assert!(verdict.report[0].exempted);
    assert_eq!(verdict.report[0].classified.class, CompatClass::Breaking);
}

#[test]
fn test_valid_override_passes_and_keeps_full_report() {
    let old = areas_doc(json!({ "count": { "type": "integer" } }), json!(["count"]));
    let new = areas_doc(json!({}), json!([]));

    let config = GateConfigFile::from_yaml("override_token_env_var: GATE_TOKEN").unwrap();
    let policy = config.resolve(|name| {
        (name == "GATE_TOKEN").then(|| "release-2026-08".to_string())
    });
    let outcome = check_one(old.clone(), new.clone(), &policy);

    assert_eq!(outcome.status, ExitStatus::Pass);
    let verdict = &outcome.verdicts[0].verdict;
    assert!(verdict.override_applied);
    assert_eq!(verdict.breaking_count, 1);

    // Override transparency: the report content matches a run without the
    // token, only the pass flag and override marker differ.
    let without = check_one(old, new, &PolicyConfig::default());
    assert_eq!(verdict.report, without.verdicts[0].verdict.report);
}

#[test]
fn test_invalid_override_token_is_exit_2() {
    let old = areas_doc(json!({}), json!([]));
    let new = areas_doc(json!({}), json!([]));

    let config = GateConfigFile::from_yaml("override_token_env_var: GATE_TOKEN").unwrap();
    // Set but blank: the caller asserted an override and it is broken.
    let policy = config.resolve(|_| Some(String::new()));
    let outcome = check_one(old, new, &policy);

    assert_eq!(outcome.status, ExitStatus::InputError);
    assert!(outcome.fatal.is_some());
}
