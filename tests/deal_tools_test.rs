// ABOUTME: Integration tests for create_deal and update_deal.
// ABOUTME: Covers organization resolution, open-deal warnings, stage parsing, and no-op updates.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Integration tests for the deal mutation tools.

mod common;

use common::{create_test_harness, seed_deal, seed_organization};
use relay_crm_assistant::tools::FailureCode;
use serde_json::json;

#[tokio::test]
async fn create_deal_attaches_to_resolved_organization() {
    let harness = create_test_harness();
    let org = seed_organization(&harness, "Acme Corp").await.unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "create_deal",
            json!({
                "name": "Acme Renewal",
                "amount": 50000,
                "stage": "proposal",
                "organization_id": org.id,
            }),
            &ctx,
        )
        .await
        .unwrap();

    assert!(report.is_success(), "unexpected failure: {}", report.message());
    let json = report.to_json();
    assert_eq!(json["deal"]["name"], "Acme Renewal");
    assert_eq!(json["deal"]["organization_id"], org.id.to_string());
    assert_eq!(json["details"]["stage"], "proposal");
    assert!(json["message"].as_str().unwrap().contains("$50000"));
}

#[tokio::test]
async fn create_deal_fails_for_unknown_organization() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute(
            "create_deal",
            json!({"name": "Orphan Deal", "organization_id": uuid::Uuid::new_v4()}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(
        report.failure_code(),
        Some(FailureCode::OrganizationNotFound)
    );
}

#[tokio::test]
async fn create_deal_warns_about_same_name_open_deal() {
    let harness = create_test_harness();
    let org = seed_organization(&harness, "Acme Corp").await.unwrap();
    seed_deal(&harness, "Acme Renewal", Some(1000.0), Some(org.id))
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "create_deal",
            json!({"name": "acme renewal", "organization_id": org.id}),
            &ctx,
        )
        .await
        .unwrap();

    // Same-name open deals warn but do not block.
    assert!(report.is_success());
    let json = report.to_json();
    let warnings = json["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("Acme Renewal"));
}

#[tokio::test]
async fn create_deal_rejects_negative_amounts_and_bad_stages() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute("create_deal", json!({"name": "Bad", "amount": -5.0}), &ctx)
        .await
        .unwrap();
    assert_eq!(report.failure_code(), Some(FailureCode::ValidationFailed));

    let report = harness
        .registry
        .execute("create_deal", json!({"name": "Bad", "stage": "limbo"}), &ctx)
        .await
        .unwrap();
    assert_eq!(report.failure_code(), Some(FailureCode::ValidationFailed));
    assert!(report.message().contains("Invalid deal stage"));
}

#[tokio::test]
async fn update_deal_with_identical_values_issues_no_write() {
    let harness = create_test_harness();
    let deal = seed_deal(&harness, "Acme Renewal", Some(50000.0), None)
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_deal",
            json!({"deal_id": deal.id, "name": "Acme Renewal", "amount": 50000.0}),
            &ctx,
        )
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.to_json()["details"]["changes_detected"], 0);
    assert_eq!(harness.store.deal_write_count(), 0);
}

#[tokio::test]
async fn update_deal_diffs_amount_and_stage() {
    let harness = create_test_harness();
    let deal = seed_deal(&harness, "Acme Renewal", Some(50000.0), None)
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_deal",
            json!({"deal_id": deal.id, "amount": 75000.0, "stage": "negotiation"}),
            &ctx,
        )
        .await
        .unwrap();

    assert!(report.is_success());
    let json = report.to_json();
    assert_eq!(json["details"]["changes_detected"], 2);
    assert_eq!(json["deal"]["amount"], 75000.0);
    assert_eq!(json["deal"]["stage"], "negotiation");

    let changes = json["details"]["changes"].as_array().unwrap();
    assert!(changes
        .iter()
        .any(|c| c.as_str().unwrap() == "amount: $50000 → $75000"));
    assert!(changes
        .iter()
        .any(|c| c.as_str().unwrap() == "stage: lead → negotiation"));
}

#[tokio::test]
async fn update_deal_reattachment_requires_resolvable_organization() {
    let harness = create_test_harness();
    let deal = seed_deal(&harness, "Acme Renewal", None, None).await.unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_deal",
            json!({"deal_id": deal.id, "organization_id": uuid::Uuid::new_v4()}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(
        report.failure_code(),
        Some(FailureCode::OrganizationNotFound)
    );
    assert_eq!(harness.store.deal_write_count(), 0);
}

#[tokio::test]
async fn update_deal_unknown_id_is_not_found() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute(
            "update_deal",
            json!({"deal_id": uuid::Uuid::new_v4(), "amount": 100.0}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::DealNotFound));
}

#[tokio::test]
async fn create_deal_requires_auth() {
    let harness = create_test_harness();
    let ctx = harness.anonymous_context("conv-1");

    let report = harness
        .registry
        .execute("create_deal", json!({"name": "Acme Renewal"}), &ctx)
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::AuthRequired));
}
