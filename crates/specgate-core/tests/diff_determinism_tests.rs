//! Property tests for diff determinism and classification totality.

use proptest::prelude::*;
use serde_json::{json, Value};
use specgate_core::{classify_all, compute_diff, DocumentKind, SchemaModel};

fn primitive_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("string"),
        Just("integer"),
        Just("number"),
        Just("boolean"),
    ]
}

fn field_node() -> impl Strategy<Value = Value> {
    prop_oneof![
        primitive_type().prop_map(|t| json!({ "type": t })),
        proptest::collection::btree_set("[a-z]{1,6}", 1..4)
            .prop_map(|values| json!({ "type": "enum", "values": values })),
        primitive_type().prop_map(|t| json!({ "type": "array", "items": { "type": t } })),
    ]
}

fn response_body() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-z]{1,8}", field_node(), 0..5).prop_map(|fields| {
        json!({ "type": "object", "fields": fields })
    })
}

fn interface_doc() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("/[a-z]{1,8}", response_body(), 0..4).prop_map(|ops| {
        let operations: Vec<Value> = ops
            .into_iter()
            .map(|(path, body)| {
                json!({ "path": path, "method": "GET", "responses": { "200": body } })
            })
            .collect();
        json!({ "kind": "interface", "operations": operations })
    })
}

fn parse(doc: &Value) -> SchemaModel {
    SchemaModel::parse(DocumentKind::Interface, doc).unwrap()
}

proptest! {
    #[test]
    fn diff_of_model_with_itself_is_empty(doc in interface_doc()) {
        let model = parse(&doc);
        let changes = compute_diff(&model, &model).unwrap();
        prop_assert!(changes.is_empty(), "self-diff produced {} changes", changes.len());
    }

    #[test]
    fn diff_is_deterministic_across_runs(old in interface_doc(), new in interface_doc()) {
        let old_model = parse(&old);
        let new_model = parse(&new);
        let first = compute_diff(&old_model, &new_model).unwrap();
        let second = compute_diff(&old_model, &new_model).unwrap();
        prop_assert_eq!(first, second);
    }

    // The rule table is total: every change the engine can emit gets a
    // class without panicking.
    #[test]
    fn every_emitted_change_classifies(old in interface_doc(), new in interface_doc()) {
        let changes = compute_diff(&parse(&old), &parse(&new)).unwrap();
        let classified = classify_all(&changes);
        prop_assert_eq!(classified.len(), changes.len());
        for c in &classified {
            prop_assert!(!c.rule_id.is_empty());
            prop_assert!(!c.rationale.is_empty());
        }
    }
}
