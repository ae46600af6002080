// ABOUTME: Integration tests for ToolRegistry registration, discovery, and dispatch.
// ABOUTME: Covers schema listing, categories, capability filtering, and unknown-tool errors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Integration tests for `ToolRegistry` registration and dispatch paths.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::create_test_harness;
use relay_crm_assistant::errors::{AppResult, ErrorCode};
use relay_crm_assistant::schema::JsonSchema;
use relay_crm_assistant::tools::{
    CrmTool, ToolCapabilities, ToolExecutionContext, ToolRegistry, ToolReport,
};
use serde_json::{json, Value};

#[tokio::test]
async fn builtin_registration_covers_all_seven_tools() {
    let harness = create_test_harness();

    assert_eq!(harness.registry.len(), 7);
    for name in [
        "create_organization",
        "update_organization",
        "create_person",
        "update_person",
        "create_deal",
        "update_deal",
        "think",
    ] {
        assert!(harness.registry.contains(name), "{name} should be registered");
    }
}

#[tokio::test]
async fn categories_group_crm_and_reasoning_tools() {
    let harness = create_test_harness();

    let crm = harness.registry.tools_in_category("crm");
    assert_eq!(crm.len(), 6);
    assert!(crm.contains(&"create_deal"));

    let reasoning = harness.registry.tools_in_category("reasoning");
    assert_eq!(reasoning, vec!["think"]);
}

#[tokio::test]
async fn schemas_advertise_wire_format() {
    let harness = create_test_harness();

    let schemas = harness.registry.tool_schemas();
    assert_eq!(schemas.len(), 7);

    let create_org = schemas
        .iter()
        .find(|s| s.name == "create_organization")
        .unwrap();
    let json = serde_json::to_value(create_org).unwrap();
    assert_eq!(json["inputSchema"]["type"], "object");
    assert_eq!(json["inputSchema"]["required"][0], "name");
    assert!(json["inputSchema"]["properties"]["name"]["description"]
        .as_str()
        .unwrap()
        .contains("name"));
}

#[tokio::test]
async fn capability_filtering_separates_writers_from_reasoning() {
    let harness = create_test_harness();

    let writers = harness.registry.write_tools();
    assert_eq!(writers.len(), 6);
    assert!(!writers.contains(&"think"));

    let reasoning = harness
        .registry
        .filter_by_capabilities(ToolCapabilities::REASONING);
    assert_eq!(reasoning.len(), 1);
    assert_eq!(reasoning[0].name(), "think");
}

#[tokio::test]
async fn executing_an_unregistered_tool_is_an_error_not_a_report() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let result = harness.registry.execute("summon_unicorn", json!({}), &ctx).await;

    let err = result.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(err.message.contains("summon_unicorn"));
}

struct StubTool {
    name: &'static str,
    marker: &'static str,
}

#[async_trait]
impl CrmTool for StubTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Stub tool for registry tests"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(&[], &[])
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DATA
    }

    async fn execute(&self, _args: Value, _ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        Ok(ToolReport::success(format!("✅ {}", self.marker)).finish(Vec::new()))
    }
}

#[tokio::test]
async fn re_registering_a_name_replaces_the_previous_tool() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StubTool {
        name: "stub",
        marker: "first",
    }));
    registry.register(Arc::new(StubTool {
        name: "stub",
        marker: "second",
    }));

    assert_eq!(registry.len(), 1);

    // Last registration wins.
    let report = registry.execute("stub", json!({}), &ctx).await.unwrap();
    assert_eq!(report.message(), "✅ second");
}

#[tokio::test]
async fn contexts_isolate_concurrent_calls() {
    let harness = create_test_harness();

    // Two contexts for the same conversation still get distinct request ids.
    let a = harness.context("conv-1");
    let b = harness.context("conv-1");
    assert_ne!(a.request_id, b.request_id);

    // Racing calls share no mutable state; both land.
    let (ra, rb) = tokio::join!(
        harness
            .registry
            .execute("create_organization", json!({"name": "Org A"}), &a),
        harness
            .registry
            .execute("create_organization", json!({"name": "Org B"}), &b),
    );
    assert!(ra.unwrap().is_success());
    assert!(rb.unwrap().is_success());
}
