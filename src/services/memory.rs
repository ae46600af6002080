// ABOUTME: DashMap-backed in-memory implementation of the CRM domain services.
// ABOUTME: Backs the CLI and the test suite; production wires real service clients.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # In-Memory CRM Store
//!
//! A single store implementing all four service traits, scoped per owning
//! user. Write methods count invocations so tests can assert that no-op
//! updates issue zero writes, and reasoning-trace writes can be forced to
//! fail to exercise the think tool's fatal-persistence path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{
    Deal, DealPatch, NewDeal, NewOrganization, NewPerson, Organization, OrganizationPatch, Person,
    PersonPatch,
};

use super::reasoning::{ReasoningTraceRecord, ReasoningTraceStore};
use super::traits::{DealService, OrganizationService, PersonService};

/// In-memory CRM store keyed by owning user
#[derive(Default)]
pub struct InMemoryCrm {
    organizations: DashMap<Uuid, Vec<Organization>>,
    people: DashMap<Uuid, Vec<Person>>,
    deals: DashMap<Uuid, Vec<Deal>>,
    traces: DashMap<String, Vec<ReasoningTraceRecord>>,
    org_writes: AtomicU64,
    person_writes: AtomicU64,
    deal_writes: AtomicU64,
    fail_trace_writes: AtomicBool,
}

impl InMemoryCrm {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of organization update calls issued so far
    #[must_use]
    pub fn organization_write_count(&self) -> u64 {
        self.org_writes.load(Ordering::Relaxed)
    }

    /// Number of person update calls issued so far
    #[must_use]
    pub fn person_write_count(&self) -> u64 {
        self.person_writes.load(Ordering::Relaxed)
    }

    /// Number of deal update calls issued so far
    #[must_use]
    pub fn deal_write_count(&self) -> u64 {
        self.deal_writes.load(Ordering::Relaxed)
    }

    /// Make subsequent reasoning-trace writes fail (for tests)
    pub fn fail_trace_writes(&self, fail: bool) {
        self.fail_trace_writes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl OrganizationService for InMemoryCrm {
    async fn list_organizations(
        &self,
        user_id: Uuid,
        _auth_token: &str,
    ) -> Result<Vec<Organization>> {
        Ok(self
            .organizations
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn get_organization(
        &self,
        user_id: Uuid,
        id: Uuid,
        _auth_token: &str,
    ) -> Result<Option<Organization>> {
        Ok(self
            .organizations
            .get(&user_id)
            .and_then(|entry| entry.iter().find(|org| org.id == id).cloned()))
    }

    async fn create_organization(
        &self,
        user_id: Uuid,
        input: NewOrganization,
        _auth_token: &str,
    ) -> Result<Organization> {
        let organization = Organization::new(input);
        self.organizations
            .entry(user_id)
            .or_default()
            .push(organization.clone());
        Ok(organization)
    }

    async fn update_organization(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: OrganizationPatch,
        _auth_token: &str,
    ) -> Result<Organization> {
        self.org_writes.fetch_add(1, Ordering::Relaxed);

        let mut entry = self
            .organizations
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("no organizations for user {user_id}"))?;
        let org = entry
            .iter_mut()
            .find(|org| org.id == id)
            .ok_or_else(|| anyhow!("organization {id} not found"))?;

        if let Some(name) = patch.name {
            org.name = name;
        }
        if let Some(domain) = patch.domain {
            org.domain = Some(domain);
        }
        if let Some(phone) = patch.phone {
            org.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            org.address = Some(address);
        }
        if let Some(industry) = patch.industry {
            org.industry = Some(industry);
        }
        if let Some(notes) = patch.notes {
            org.notes = Some(notes);
        }
        org.updated_at = Utc::now();

        Ok(org.clone())
    }
}

#[async_trait]
impl PersonService for InMemoryCrm {
    async fn list_people(&self, user_id: Uuid, _auth_token: &str) -> Result<Vec<Person>> {
        Ok(self
            .people
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn get_person(
        &self,
        user_id: Uuid,
        id: Uuid,
        _auth_token: &str,
    ) -> Result<Option<Person>> {
        Ok(self
            .people
            .get(&user_id)
            .and_then(|entry| entry.iter().find(|person| person.id == id).cloned()))
    }

    async fn create_person(
        &self,
        user_id: Uuid,
        input: NewPerson,
        _auth_token: &str,
    ) -> Result<Person> {
        let person = Person::new(input);
        self.people.entry(user_id).or_default().push(person.clone());
        Ok(person)
    }

    async fn update_person(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: PersonPatch,
        _auth_token: &str,
    ) -> Result<Person> {
        self.person_writes.fetch_add(1, Ordering::Relaxed);

        let mut entry = self
            .people
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("no people for user {user_id}"))?;
        let person = entry
            .iter_mut()
            .find(|person| person.id == id)
            .ok_or_else(|| anyhow!("person {id} not found"))?;

        if let Some(first_name) = patch.first_name {
            person.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            person.last_name = Some(last_name);
        }
        if let Some(email) = patch.email {
            person.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            person.phone = Some(phone);
        }
        if let Some(job_title) = patch.job_title {
            person.job_title = Some(job_title);
        }
        if let Some(organization_id) = patch.organization_id {
            person.organization_id = Some(organization_id);
        }
        if let Some(notes) = patch.notes {
            person.notes = Some(notes);
        }
        person.updated_at = Utc::now();

        Ok(person.clone())
    }
}

#[async_trait]
impl DealService for InMemoryCrm {
    async fn list_deals(&self, user_id: Uuid, _auth_token: &str) -> Result<Vec<Deal>> {
        Ok(self
            .deals
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn get_deal(&self, user_id: Uuid, id: Uuid, _auth_token: &str) -> Result<Option<Deal>> {
        Ok(self
            .deals
            .get(&user_id)
            .and_then(|entry| entry.iter().find(|deal| deal.id == id).cloned()))
    }

    async fn create_deal(&self, user_id: Uuid, input: NewDeal, _auth_token: &str) -> Result<Deal> {
        let deal = Deal::new(input);
        self.deals.entry(user_id).or_default().push(deal.clone());
        Ok(deal)
    }

    async fn update_deal(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: DealPatch,
        _auth_token: &str,
    ) -> Result<Deal> {
        self.deal_writes.fetch_add(1, Ordering::Relaxed);

        let mut entry = self
            .deals
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("no deals for user {user_id}"))?;
        let deal = entry
            .iter_mut()
            .find(|deal| deal.id == id)
            .ok_or_else(|| anyhow!("deal {id} not found"))?;

        if let Some(name) = patch.name {
            deal.name = name;
        }
        if let Some(amount) = patch.amount {
            deal.amount = Some(amount);
        }
        if let Some(stage) = patch.stage {
            deal.stage = stage;
        }
        if let Some(organization_id) = patch.organization_id {
            deal.organization_id = Some(organization_id);
        }
        if let Some(contact_id) = patch.contact_id {
            deal.contact_id = Some(contact_id);
        }
        if let Some(expected_close_date) = patch.expected_close_date {
            deal.expected_close_date = Some(expected_close_date);
        }
        if let Some(notes) = patch.notes {
            deal.notes = Some(notes);
        }
        deal.updated_at = Utc::now();

        Ok(deal.clone())
    }
}

#[async_trait]
impl ReasoningTraceStore for InMemoryCrm {
    async fn insert_trace(&self, record: &ReasoningTraceRecord) -> Result<()> {
        if self.fail_trace_writes.load(Ordering::Relaxed) {
            bail!("reasoning trace store unavailable");
        }
        self.traces
            .entry(record.conversation_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn list_traces(&self, conversation_id: &str) -> Result<Vec<ReasoningTraceRecord>> {
        Ok(self
            .traces
            .get(conversation_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}
