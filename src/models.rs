// ABOUTME: Core CRM data models shared by the tools and the domain-service layer.
// ABOUTME: Defines Organization, Person, Deal, and their input/patch companions.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Data Models
//!
//! Core CRM data structures used throughout the assistant core. These are
//! value objects: created per request, serialized for tool reports, and
//! never shared mutably across calls.
//!
//! ## Core Models
//!
//! - `Organization`: a company/account record
//! - `Person`: a contact, optionally attached to an organization
//! - `Deal`: a sales opportunity moving through a pipeline stage
//!
//! Each entity has a `New*` input companion (create path) and a `*Patch`
//! companion carrying only the fields a caller wants to change (update path).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// A company/account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Stable identifier
    pub id: Uuid,
    /// Display name; unique per owning user by convention
    pub name: String,
    /// Primary web domain
    pub domain: Option<String>,
    /// Contact phone, stored normalized
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Industry label
    pub industry: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Create a new organization from input, assigning id and timestamps
    #[must_use]
    pub fn new(input: NewOrganization) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            domain: input.domain,
            phone: input.phone,
            address: input.address,
            industry: input.industry,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating an organization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Display name (required)
    pub name: String,
    /// Primary web domain
    pub domain: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Industry label
    pub industry: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Fields to change on an organization; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationPatch {
    /// New display name
    pub name: Option<String>,
    /// New web domain
    pub domain: Option<String>,
    /// New contact phone
    pub phone: Option<String>,
    /// New postal address
    pub address: Option<String>,
    /// New industry label
    pub industry: Option<String>,
    /// New notes
    pub notes: Option<String>,
}

impl OrganizationPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.domain.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.industry.is_none()
            && self.notes.is_none()
    }
}

/// A contact, optionally attached to an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Stable identifier
    pub id: Uuid,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Email address; unique per owning user by convention
    pub email: Option<String>,
    /// Phone number, stored normalized
    pub phone: Option<String>,
    /// Job title
    pub job_title: Option<String>,
    /// Owning organization, when attached
    pub organization_id: Option<Uuid>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person from input, assigning id and timestamps
    #[must_use]
    pub fn new(input: NewPerson) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            job_title: input.job_title,
            organization_id: input.organization_id,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Human-readable display name, falling back to email
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone().unwrap_or_else(|| "(unnamed)".into()),
        }
    }
}

/// Input for creating a person
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPerson {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Job title
    pub job_title: Option<String>,
    /// Owning organization
    pub organization_id: Option<Uuid>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl NewPerson {
    /// A person needs at least a name fragment or an email to be addressable
    #[must_use]
    pub const fn has_identity(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.email.is_some()
    }
}

/// Fields to change on a person; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New job title
    pub job_title: Option<String>,
    /// New owning organization
    pub organization_id: Option<Uuid>,
    /// New notes
    pub notes: Option<String>,
}

impl PersonPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.job_title.is_none()
            && self.organization_id.is_none()
            && self.notes.is_none()
    }
}

/// Pipeline stage of a deal
#[non_exhaustive]
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    /// Unqualified inbound interest
    #[default]
    Lead,
    /// Qualified opportunity
    Qualified,
    /// Proposal sent
    Proposal,
    /// Terms under negotiation
    Negotiation,
    /// Closed and won
    ClosedWon,
    /// Closed and lost
    ClosedLost,
}

impl DealStage {
    /// Stable snake_case identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed_won",
            Self::ClosedLost => "closed_lost",
        }
    }

    /// Whether the deal is still in play
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl Display for DealStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(Self::Lead),
            "qualified" => Ok(Self::Qualified),
            "proposal" => Ok(Self::Proposal),
            "negotiation" => Ok(Self::Negotiation),
            "closed_won" | "won" => Ok(Self::ClosedWon),
            "closed_lost" | "lost" => Ok(Self::ClosedLost),
            other => Err(AppError::invalid_input(format!(
                "Invalid deal stage '{other}'. Must be: lead, qualified, proposal, negotiation, closed_won, closed_lost"
            ))),
        }
    }
}

/// A sales opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Stable identifier
    pub id: Uuid,
    /// Deal title
    pub name: String,
    /// Monetary value, when known
    pub amount: Option<f64>,
    /// Pipeline stage
    pub stage: DealStage,
    /// Associated organization
    pub organization_id: Option<Uuid>,
    /// Primary contact
    pub contact_id: Option<Uuid>,
    /// Expected close date
    pub expected_close_date: Option<NaiveDate>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Create a new deal from input, assigning id and timestamps
    #[must_use]
    pub fn new(input: NewDeal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            amount: input.amount,
            stage: input.stage.unwrap_or_default(),
            organization_id: input.organization_id,
            contact_id: input.contact_id,
            expected_close_date: input.expected_close_date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a deal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDeal {
    /// Deal title (required)
    pub name: String,
    /// Monetary value
    pub amount: Option<f64>,
    /// Initial stage, defaults to `lead`
    pub stage: Option<DealStage>,
    /// Associated organization
    pub organization_id: Option<Uuid>,
    /// Primary contact
    pub contact_id: Option<Uuid>,
    /// Expected close date
    pub expected_close_date: Option<NaiveDate>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Fields to change on a deal; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealPatch {
    /// New title
    pub name: Option<String>,
    /// New monetary value
    pub amount: Option<f64>,
    /// New pipeline stage
    pub stage: Option<DealStage>,
    /// New associated organization
    pub organization_id: Option<Uuid>,
    /// New primary contact
    pub contact_id: Option<Uuid>,
    /// New expected close date
    pub expected_close_date: Option<NaiveDate>,
    /// New notes
    pub notes: Option<String>,
}

impl DealPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.stage.is_none()
            && self.organization_id.is_none()
            && self.contact_id.is_none()
            && self.expected_close_date.is_none()
            && self.notes.is_none()
    }
}
