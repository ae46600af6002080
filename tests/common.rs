// ABOUTME: Shared test utilities and fixtures for integration tests.
// ABOUTME: Provides registry/services harness construction and seeded CRM records.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence
#![allow(dead_code)]

//! Shared test utilities for `relay_crm_assistant`
//!
//! Provides common setup to reduce duplication across integration tests:
//! quiet logging, an in-memory CRM with visible write counters, a registry
//! with all built-in tools, and record seeding helpers.

use std::sync::{Arc, Once};

use anyhow::Result;
use uuid::Uuid;

use relay_crm_assistant::models::{Deal, NewDeal, NewOrganization, NewPerson, Organization, Person};
use relay_crm_assistant::services::memory::InMemoryCrm;
use relay_crm_assistant::services::CrmServices;
use relay_crm_assistant::tools::{ToolExecutionContext, ToolRegistry};

/// Auth token used by every test call
pub const TEST_TOKEN: &str = "test-token";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Everything a tool-execution test needs
pub struct TestHarness {
    /// The raw in-memory store, for write counters and trace inspection
    pub store: Arc<InMemoryCrm>,
    /// The service container handed to contexts
    pub services: Arc<CrmServices>,
    /// Registry with all built-in tools registered
    pub registry: ToolRegistry,
    /// The owning test user
    pub user_id: Uuid,
}

impl TestHarness {
    /// Build an authenticated per-call context
    pub fn context(&self, conversation_id: &str) -> ToolExecutionContext {
        ToolExecutionContext::new(conversation_id, self.services.clone())
            .with_auth(TEST_TOKEN, self.user_id)
    }

    /// Build a context with no credentials
    pub fn anonymous_context(&self, conversation_id: &str) -> ToolExecutionContext {
        ToolExecutionContext::new(conversation_id, self.services.clone())
    }
}

/// Standard harness setup
pub fn create_test_harness() -> TestHarness {
    init_test_logging();

    let store = Arc::new(InMemoryCrm::new());
    let services = Arc::new(CrmServices::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    ));

    let mut registry = ToolRegistry::new();
    registry.register_builtin_tools();

    TestHarness {
        store,
        services,
        registry,
        user_id: Uuid::new_v4(),
    }
}

/// Seed an organization owned by the harness user
pub async fn seed_organization(harness: &TestHarness, name: &str) -> Result<Organization> {
    harness
        .services
        .organizations
        .create_organization(
            harness.user_id,
            NewOrganization {
                name: name.into(),
                ..NewOrganization::default()
            },
            TEST_TOKEN,
        )
        .await
}

/// Seed a person owned by the harness user
pub async fn seed_person(
    harness: &TestHarness,
    first_name: &str,
    email: Option<&str>,
) -> Result<Person> {
    harness
        .services
        .people
        .create_person(
            harness.user_id,
            NewPerson {
                first_name: Some(first_name.into()),
                email: email.map(str::to_owned),
                ..NewPerson::default()
            },
            TEST_TOKEN,
        )
        .await
}

/// Seed a deal owned by the harness user
pub async fn seed_deal(
    harness: &TestHarness,
    name: &str,
    amount: Option<f64>,
    organization_id: Option<Uuid>,
) -> Result<Deal> {
    harness
        .services
        .deals
        .create_deal(
            harness.user_id,
            NewDeal {
                name: name.into(),
                amount,
                organization_id,
                ..NewDeal::default()
            },
            TEST_TOKEN,
        )
        .await
}
