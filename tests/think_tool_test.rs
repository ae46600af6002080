// ABOUTME: Integration tests for the think tool's heuristics and persistence behavior.
// ABOUTME: Covers depth classification, malformed-input tolerance, and fatal trace writes.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Integration tests for the think tool.

mod common;

use common::create_test_harness;
use relay_crm_assistant::errors::ErrorCode;
use relay_crm_assistant::services::ReasoningTraceStore;
use serde_json::json;

#[tokio::test]
async fn think_persists_one_trace_per_call() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-think");

    let report = harness
        .registry
        .execute(
            "think",
            json!({
                "acknowledgment": "Understood, setting up the Acme account.",
                "reasoning": "The user wants a new organization with a primary contact.",
                "strategy": "Prioritize the organization record, then attach the contact.",
                "next_steps": "1. Create the organization 2. Create the contact",
            }),
            &ctx,
        )
        .await
        .unwrap();

    assert!(report.is_success());
    let json = report.to_json();
    assert!(json["details"]["thinking"]["id"]
        .as_str()
        .unwrap()
        .starts_with("think_"));
    assert_eq!(json["details"]["thinking"]["type"], "thinking");

    let traces = harness.store.list_traces("conv-think").await.unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].record_type, "reasoning");
    assert_eq!(traces[0].thinking_budget, None);
    assert!(traces[0].strategy.contains("Prioritize"));
}

#[tokio::test]
async fn think_classifies_deep_reasoning() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-think");

    // Over 500 chars with three distinct connectives.
    let reasoning = format!(
        "However, the account is large; therefore we should split the rollout. \
         Furthermore, the renewal date is close. {}",
        "Additional context. ".repeat(30)
    );
    assert!(reasoning.len() > 500);

    let report = harness
        .registry
        .execute(
            "think",
            json!({
                "reasoning": reasoning,
                "strategy": "Optimize the rollout order.",
                "next_steps": "1. Draft plan",
            }),
            &ctx,
        )
        .await
        .unwrap();

    let json = report.to_json();
    assert_eq!(
        json["details"]["thinking"]["metadata"]["thinking_depth"],
        "deep"
    );
}

#[tokio::test]
async fn think_tolerates_missing_required_fields() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-think");

    // Entirely empty input: required fields default to placeholders and the
    // classification is shallow, without any error.
    let report = harness
        .registry
        .execute("think", json!({}), &ctx)
        .await
        .unwrap();

    assert!(report.is_success());
    let json = report.to_json();
    assert_eq!(
        json["details"]["thinking"]["metadata"]["thinking_depth"],
        "shallow"
    );
    assert_eq!(
        json["details"]["thinking"]["reasoning"],
        "(no reasoning provided)"
    );
}

#[tokio::test]
async fn think_scores_confidence_with_adjustments() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-think");

    let report = harness
        .registry
        .execute(
            "think",
            json!({
                "reasoning": "Short thought.",
                "strategy": "Basic plan.",
                "concerns": "c".repeat(60),
                "next_steps": "1. First 2. Second",
            }),
            &ctx,
        )
        .await
        .unwrap();

    let json = report.to_json();
    // 0.8 base − 0.2 long concerns + 0.1 enumerated steps.
    let confidence = json["details"]["thinking"]["metadata"]["confidence_level"]
        .as_f64()
        .unwrap();
    assert!((confidence - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn think_persistence_failure_is_fatal() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-think");

    harness.store.fail_trace_writes(true);

    let result = harness
        .registry
        .execute(
            "think",
            json!({"reasoning": "r", "strategy": "s", "next_steps": "n"}),
            &ctx,
        )
        .await;

    // The trace is the tool's primary output: losing it fails the call.
    let err = result.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);

    harness.store.fail_trace_writes(false);
    assert!(harness
        .registry
        .execute(
            "think",
            json!({"reasoning": "r", "strategy": "s", "next_steps": "n"}),
            &ctx,
        )
        .await
        .is_ok());
}
