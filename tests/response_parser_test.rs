// ABOUTME: Integration tests for the response enhancement pipeline.
// ABOUTME: Covers entity scoping/dedup, actionable data extraction, and action synthesis.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Integration tests for the response enhancement pipeline.

mod common;

use common::init_test_logging;
use relay_crm_assistant::parser::{
    dispatch_action, enhance_response, ActionKind, DetectedEntityType, SuggestedAction,
    ToolThought,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn thought(payload: Value) -> ToolThought {
    ToolThought::new(None, payload)
}

#[test]
fn entities_come_only_from_the_last_tool_thought() {
    init_test_logging();

    let first = thought(json!({"id": "a", "name": "Stale Org"}));
    let second = thought(json!({"id": "b", "name": "Fresh Org"}));

    let result = enhance_response("Done.", &[first, second]);

    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].id, "b");
    assert_eq!(result.entities[0].entity_type, DetectedEntityType::Organization);
}

#[test]
fn duplicate_ids_keep_the_later_record() {
    init_test_logging();

    let payload = json!([
        {"id": "d1", "name": "Old Name", "amount": 100},
        {"id": "d1", "name": "New Name", "amount": 250},
    ]);
    let result = enhance_response("", &[thought(payload)]);

    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].name.as_deref(), Some("New Name"));
    assert_eq!(result.entities[0].amount, Some(250.0));
}

#[test]
fn deal_actions_are_deterministic_for_a_detected_deal() {
    init_test_logging();

    let payload = json!({"id": "d1", "name": "Acme Renewal", "amount": 50000});
    let result = enhance_response("", &[thought(payload)]);

    let ids: Vec<&str> = result.suggested_actions.iter().map(|a| a.id.as_str()).collect();
    assert!(ids.contains(&"view-deal-d1"));
    assert!(ids.contains(&"edit-deal-d1"));

    // No duplicates for a single entity.
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());

    // Correlation is by explicit entity id, not substring containment.
    for action in &result.suggested_actions {
        assert_eq!(action.entity_id.as_deref(), Some("d1"));
    }
}

#[test]
fn organizations_cross_reference_into_deal_names() {
    init_test_logging();

    let payload = json!([
        {"id": "o1", "name": "Acme Corp"},
        {"id": "d1", "name": "", "amount": 50000, "organization_id": "o1"},
    ]);
    let result = enhance_response("", &[thought(payload)]);

    let deal = result.entities.iter().find(|e| e.id == "d1").unwrap();
    assert_eq!(deal.name.as_deref(), Some("Acme Corp Opportunity"));
    assert_eq!(deal.organization_name.as_deref(), Some("Acme Corp"));

    // Organization actions come out alongside deal actions.
    assert!(result
        .suggested_actions
        .iter()
        .any(|a| a.id == "view-organization-o1"));
    assert!(result
        .suggested_actions
        .iter()
        .any(|a| a.id == "create-contact-o1"));
}

#[test]
fn actionable_data_extracts_ids_and_large_amounts_from_text() {
    init_test_logging();

    let text = "Created deal 6f9619ff-8b86-4d01-b42d-00cf4fc964ff worth $12,500.50 (fee 75).";
    let result = enhance_response(text, &[]);

    assert!(result
        .actionable_data
        .iter()
        .any(|d| d.data_type == "id" && d.copyable));
    assert!(result
        .actionable_data
        .iter()
        .any(|d| d.data_type == "amount" && d.value == json!(12500.50)));
    // Small numbers are noise, not actionable data.
    assert!(!result.actionable_data.iter().any(|d| d.value == json!(75.0)));
}

#[test]
fn context_actions_depend_on_text_and_entities() {
    init_test_logging();

    // Creation language alone adds the create follow-up.
    let created = enhance_response("I created the deal for you.", &[]);
    assert!(created
        .suggested_actions
        .iter()
        .any(|a| a.id == "create-deal-followup" && a.action == ActionKind::Create));

    // Search language only counts when at least one entity was found.
    let no_entities = enhance_response("Found 3 results.", &[]);
    assert!(!no_entities.suggested_actions.iter().any(|a| a.id == "refine-search"));

    let with_entity = enhance_response(
        "Found 3 results.",
        &[thought(json!({"id": "o1", "name": "Acme Corp"}))],
    );
    assert!(with_entity.suggested_actions.iter().any(|a| a.id == "refine-search"));
}

#[test]
fn has_enhancements_reflects_all_three_lists() {
    init_test_logging();

    let empty = enhance_response("Nothing to see here", &[]);
    assert!(!empty.has_enhancements);
    assert!(empty.entities.is_empty());
    assert!(empty.actionable_data.is_empty());
    assert!(empty.suggested_actions.is_empty());

    let with_entity = enhance_response("ok", &[thought(json!({"id": "o1", "name": "Acme"}))]);
    assert!(with_entity.has_enhancements);
}

#[test]
fn parsing_is_deterministic_across_repeated_calls() {
    init_test_logging();

    let payload = json!([
        {"id": "o1", "name": "Acme Corp"},
        {"id": "d1", "amount": 900.0, "organization_id": "o1"},
    ]);
    let text = "Created and found things worth $4,000";

    let a = enhance_response(text, &[thought(payload.clone())]);
    let b = enhance_response(text, &[thought(payload)]);

    assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
}

#[test]
fn caller_supplied_handler_receives_dispatched_actions() {
    init_test_logging();

    let payload = json!({"id": "d1", "name": "Acme Renewal", "amount": 50000});
    let result = enhance_response("", &[thought(payload)]);

    let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let handler = move |action: &SuggestedAction| {
        sink.lock().unwrap().push(action.id.clone());
    };

    for action in &result.suggested_actions {
        dispatch_action(action, Some(&handler));
    }

    let received = received.lock().unwrap();
    assert_eq!(received.as_slice(), ["view-deal-d1", "edit-deal-d1"]);
}
