// ABOUTME: Async trait definitions for the external CRM domain services.
// ABOUTME: All methods return full records on success and hard failures as errors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Domain Service Traits
//!
//! The contract the assistant core consumes. Every method is scoped to the
//! owning user and carries the caller's auth token through to the backing
//! service. Hard failures (network, storage, authorization) surface as
//! errors; "not found" is modeled as `Ok(None)` on the `get_*` methods so
//! tools can turn it into a structured report.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Deal, DealPatch, NewDeal, NewOrganization, NewPerson, Organization, OrganizationPatch, Person,
    PersonPatch,
};

/// Organization reads and writes
#[async_trait]
pub trait OrganizationService: Send + Sync {
    /// List all organizations owned by the user
    async fn list_organizations(&self, user_id: Uuid, auth_token: &str)
        -> Result<Vec<Organization>>;

    /// Get one organization by id
    async fn get_organization(
        &self,
        user_id: Uuid,
        id: Uuid,
        auth_token: &str,
    ) -> Result<Option<Organization>>;

    /// Create an organization, returning the full created record
    async fn create_organization(
        &self,
        user_id: Uuid,
        input: NewOrganization,
        auth_token: &str,
    ) -> Result<Organization>;

    /// Apply a patch, returning the full updated record
    async fn update_organization(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: OrganizationPatch,
        auth_token: &str,
    ) -> Result<Organization>;
}

/// Person reads and writes
#[async_trait]
pub trait PersonService: Send + Sync {
    /// List all people owned by the user
    async fn list_people(&self, user_id: Uuid, auth_token: &str) -> Result<Vec<Person>>;

    /// Get one person by id
    async fn get_person(&self, user_id: Uuid, id: Uuid, auth_token: &str)
        -> Result<Option<Person>>;

    /// Create a person, returning the full created record
    async fn create_person(
        &self,
        user_id: Uuid,
        input: NewPerson,
        auth_token: &str,
    ) -> Result<Person>;

    /// Apply a patch, returning the full updated record
    async fn update_person(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: PersonPatch,
        auth_token: &str,
    ) -> Result<Person>;
}

/// Deal reads and writes
#[async_trait]
pub trait DealService: Send + Sync {
    /// List all deals owned by the user
    async fn list_deals(&self, user_id: Uuid, auth_token: &str) -> Result<Vec<Deal>>;

    /// Get one deal by id
    async fn get_deal(&self, user_id: Uuid, id: Uuid, auth_token: &str) -> Result<Option<Deal>>;

    /// Create a deal, returning the full created record
    async fn create_deal(&self, user_id: Uuid, input: NewDeal, auth_token: &str) -> Result<Deal>;

    /// Apply a patch, returning the full updated record
    async fn update_deal(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: DealPatch,
        auth_token: &str,
    ) -> Result<Deal>;
}
