// ABOUTME: Integration tests for create_person and update_person.
// ABOUTME: Covers identity validation, email duplicates/conflicts, and phone normalization.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Integration tests for the person mutation tools.

mod common;

use common::{create_test_harness, seed_person};
use relay_crm_assistant::tools::FailureCode;
use serde_json::json;

#[tokio::test]
async fn create_person_requires_an_identifying_field() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute("create_person", json!({"job_title": "CTO"}), &ctx)
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::ValidationFailed));
    assert!(report.message().contains("first name, last name, or email"));
}

#[tokio::test]
async fn create_person_accepts_email_only() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute("create_person", json!({"email": "ada@example.com"}), &ctx)
        .await
        .unwrap();

    assert!(report.is_success(), "unexpected failure: {}", report.message());
    let json = report.to_json();
    assert_eq!(json["person"]["email"], "ada@example.com");
}

#[tokio::test]
async fn create_person_rejects_duplicate_email_any_casing() {
    let harness = create_test_harness();
    let existing = seed_person(&harness, "Ada", Some("ada@example.com"))
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "create_person",
            json!({"first_name": "Adeline", "email": "ADA@example.com"}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::DuplicatePerson));
    let json = report.to_json();
    assert_eq!(json["existing_person"]["id"], existing.id.to_string());
}

#[tokio::test]
async fn create_person_normalizes_phone_numbers() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute(
            "create_person",
            json!({"first_name": "Ada", "phone": "5551234567"}),
            &ctx,
        )
        .await
        .unwrap();

    let json = report.to_json();
    assert_eq!(json["person"]["phone"], "(555) 123-4567");
}

#[tokio::test]
async fn update_person_detects_phone_change_only_when_normalized_value_differs() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let created = harness
        .registry
        .execute(
            "create_person",
            json!({"first_name": "Ada", "phone": "5551234567"}),
            &ctx,
        )
        .await
        .unwrap()
        .to_json();
    let person_id = created["person"]["id"].as_str().unwrap().to_owned();

    // Same number in a different cosmetic shape: normalizes to the stored
    // value, so no change is detected and no write is issued.
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": person_id, "phone": "555.123.4567"}),
            &ctx,
        )
        .await
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.to_json()["details"]["changes_detected"], 0);
    assert_eq!(harness.store.person_write_count(), 0);

    // A genuinely different number is a change.
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": person_id, "phone": "15559876543"}),
            &ctx,
        )
        .await
        .unwrap();
    let json = report.to_json();
    assert_eq!(json["details"]["changes_detected"], 1);
    assert_eq!(json["person"]["phone"], "+1 (555) 987-6543");
    assert_eq!(harness.store.person_write_count(), 1);

    // Unrecognized shapes pass through unchanged and still diff correctly.
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": person_id, "phone": "not-a-phone"}),
            &ctx,
        )
        .await
        .unwrap();
    assert_eq!(report.to_json()["person"]["phone"], "not-a-phone");
}

#[tokio::test]
async fn update_person_email_conflict_with_other_record() {
    let harness = create_test_harness();
    let target = seed_person(&harness, "Ada", Some("ada@example.com"))
        .await
        .unwrap();
    let other = seed_person(&harness, "Grace", Some("grace@example.com"))
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": target.id, "email": "grace@example.com"}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::EmailConflict));
    let json = report.to_json();
    assert_eq!(json["existing_person"]["id"], other.id.to_string());
    assert_eq!(harness.store.person_write_count(), 0);
}

#[tokio::test]
async fn update_person_keeping_own_email_is_not_a_conflict() {
    let harness = create_test_harness();
    let target = seed_person(&harness, "Ada", Some("ada@example.com"))
        .await
        .unwrap();

    let ctx = harness.context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({
                "person_id": target.id,
                "email": "ada@example.com",
                "job_title": "Chief Engineer",
            }),
            &ctx,
        )
        .await
        .unwrap();

    assert!(report.is_success(), "unexpected failure: {}", report.message());
    let json = report.to_json();
    assert_eq!(json["details"]["changes_detected"], 1);
    assert_eq!(json["person"]["job_title"], "Chief Engineer");
}

#[tokio::test]
async fn update_person_unknown_id_is_not_found() {
    let harness = create_test_harness();
    let ctx = harness.context("conv-1");

    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": uuid::Uuid::new_v4(), "job_title": "CTO"}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::PersonNotFound));
}

#[tokio::test]
async fn update_person_requires_auth() {
    let harness = create_test_harness();
    let target = seed_person(&harness, "Ada", None).await.unwrap();

    let ctx = harness.anonymous_context("conv-1");
    let report = harness
        .registry
        .execute(
            "update_person",
            json!({"person_id": target.id, "job_title": "CTO"}),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(report.failure_code(), Some(FailureCode::AuthRequired));
}
