// ABOUTME: Tagged success/failure result type returned by every tool execution.
// ABOUTME: Serializes to the wire shape the assistant UI renders directly.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Reports
//!
//! [`ToolReport`] is the tagged union every tool returns: a success carrying
//! the affected entity and a display-ready message, or a failure carrying a
//! typed [`FailureCode`]. Business-rule outcomes (duplicates, conflicts,
//! no-op updates) are failures *here*, never `Err` - only integration bugs
//! (unknown tool name) and think-tool persistence failures propagate as
//! errors.
//!
//! `to_json()` produces the caller-facing shape: `success` always present
//! and boolean, the entity under its kind key (`organization`, `person`,
//! `deal`), a conflicting record under `existing_<kind>`, and `message`
//! always an emoji-prefixed, complete sentence suitable for direct display.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::workflow::WorkflowStep;

/// Kind of CRM entity a report refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A company/account
    Organization,
    /// A contact
    Person,
    /// A sales opportunity
    Deal,
}

impl EntityKind {
    /// JSON key the entity is reported under on success
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Person => "person",
            Self::Deal => "deal",
        }
    }

    /// JSON key a conflicting record is reported under on failure
    #[must_use]
    pub const fn existing_key(self) -> &'static str {
        match self {
            Self::Organization => "existing_organization",
            Self::Person => "existing_person",
            Self::Deal => "existing_deal",
        }
    }
}

/// Typed failure codes for expected business-rule outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// Caller supplied no credentials
    AuthRequired,
    /// Input failed the tool's minimal-field validation
    ValidationFailed,
    /// Exact-match organization collision on create
    DuplicateOrganization,
    /// Exact-match person collision on create
    DuplicatePerson,
    /// Organization rename collides with a different record
    NameConflict,
    /// Person email change collides with a different record
    EmailConflict,
    /// Target deal does not resolve
    DealNotFound,
    /// Target organization does not resolve
    OrganizationNotFound,
    /// Target person does not resolve
    PersonNotFound,
    /// Unexpected service-layer failure on create
    CreationFailed,
    /// Unexpected service-layer failure on update
    UpdateFailed,
}

impl FailureCode {
    /// Stable wire identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::DuplicateOrganization => "DUPLICATE_ORGANIZATION",
            Self::DuplicatePerson => "DUPLICATE_PERSON",
            Self::NameConflict => "NAME_CONFLICT",
            Self::EmailConflict => "EMAIL_CONFLICT",
            Self::DealNotFound => "DEAL_NOT_FOUND",
            Self::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            Self::PersonNotFound => "PERSON_NOT_FOUND",
            Self::CreationFailed => "CREATION_FAILED",
            Self::UpdateFailed => "UPDATE_FAILED",
        }
    }
}

/// A successful tool execution
#[derive(Debug, Clone)]
pub struct ToolSuccess {
    /// Emoji-prefixed, display-ready summary
    pub message: String,
    /// The affected entity, under its kind
    pub entity: Option<(EntityKind, Value)>,
    /// Structured details for the caller
    pub details: Map<String, Value>,
    /// Non-blocking warnings (close-match duplicates, ...)
    pub warnings: Vec<String>,
    /// Per-invocation observability trace
    pub workflow: Vec<WorkflowStep>,
}

/// A failed tool execution (expected, business-rule outcome)
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// Typed failure code
    pub code: FailureCode,
    /// Emoji-prefixed, display-ready summary
    pub message: String,
    /// Structured failure details
    pub details: Option<Value>,
    /// The colliding record for duplicate/conflict failures
    pub existing: Option<(EntityKind, Value)>,
    /// Actionable hint for the caller ("use the existing id", ...)
    pub suggestion: Option<String>,
    /// Per-invocation observability trace
    pub workflow: Vec<WorkflowStep>,
}

/// Tagged result of one tool execution
#[derive(Debug, Clone)]
pub enum ToolReport {
    /// The tool completed its operation
    Success(ToolSuccess),
    /// The tool hit an expected business-rule failure
    Failure(ToolFailure),
}

impl ToolReport {
    /// Start a success report with a display message
    #[must_use]
    pub fn success(message: impl Into<String>) -> ToolSuccess {
        ToolSuccess {
            message: message.into(),
            entity: None,
            details: Map::new(),
            warnings: Vec::new(),
            workflow: Vec::new(),
        }
    }

    /// Start a failure report with a code and display message
    #[must_use]
    pub fn failure(code: FailureCode, message: impl Into<String>) -> ToolFailure {
        ToolFailure {
            code,
            message: message.into(),
            details: None,
            existing: None,
            suggestion: None,
            workflow: Vec::new(),
        }
    }

    /// Whether this report is a success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The display message of either variant
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(s) => &s.message,
            Self::Failure(f) => &f.message,
        }
    }

    /// The workflow trace of either variant
    #[must_use]
    pub fn workflow_steps(&self) -> &[WorkflowStep] {
        match self {
            Self::Success(s) => &s.workflow,
            Self::Failure(f) => &f.workflow,
        }
    }

    /// The failure code, when this is a failure
    #[must_use]
    pub const fn failure_code(&self) -> Option<FailureCode> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f.code),
        }
    }

    /// Serialize to the caller-facing JSON shape
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(s) => {
                let mut obj = Map::new();
                obj.insert("success".into(), Value::Bool(true));
                obj.insert("message".into(), Value::String(s.message.clone()));
                if let Some((kind, entity)) = &s.entity {
                    obj.insert(kind.key().into(), entity.clone());
                }
                if !s.details.is_empty() {
                    obj.insert("details".into(), Value::Object(s.details.clone()));
                }
                if !s.warnings.is_empty() {
                    obj.insert("warnings".into(), json!(s.warnings));
                }
                obj.insert(
                    "workflow_steps".into(),
                    serde_json::to_value(&s.workflow).unwrap_or(Value::Null),
                );
                Value::Object(obj)
            }
            Self::Failure(f) => {
                let mut obj = Map::new();
                obj.insert("success".into(), Value::Bool(false));
                obj.insert("error".into(), Value::String(f.code.as_str().into()));
                obj.insert("message".into(), Value::String(f.message.clone()));
                if let Some(details) = &f.details {
                    obj.insert("details".into(), details.clone());
                }
                if let Some((kind, existing)) = &f.existing {
                    obj.insert(kind.existing_key().into(), existing.clone());
                }
                if let Some(suggestion) = &f.suggestion {
                    obj.insert("suggestion".into(), Value::String(suggestion.clone()));
                }
                obj.insert(
                    "workflow_steps".into(),
                    serde_json::to_value(&f.workflow).unwrap_or(Value::Null),
                );
                Value::Object(obj)
            }
        }
    }
}

impl ToolSuccess {
    /// Attach the affected entity
    #[must_use]
    pub fn with_entity(mut self, kind: EntityKind, entity: Value) -> Self {
        self.entity = Some((kind, entity));
        self
    }

    /// Attach one structured detail
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_owned(), value);
        self
    }

    /// Attach non-blocking warnings
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Attach the workflow trace and finish the report
    #[must_use]
    pub fn finish(mut self, workflow: Vec<WorkflowStep>) -> ToolReport {
        self.workflow = workflow;
        ToolReport::Success(self)
    }
}

impl ToolFailure {
    /// Attach structured failure details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the colliding record
    #[must_use]
    pub fn with_existing(mut self, kind: EntityKind, existing: Value) -> Self {
        self.existing = Some((kind, existing));
        self
    }

    /// Attach an actionable suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the workflow trace and finish the report
    #[must_use]
    pub fn finish(mut self, workflow: Vec<WorkflowStep>) -> ToolReport {
        self.workflow = workflow;
        ToolReport::Failure(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::workflow::WorkflowTrace;

    #[test]
    fn success_report_serializes_entity_under_kind_key() {
        let mut trace = WorkflowTrace::new();
        trace.completed("initialize", "starting");

        let report = ToolReport::success("✅ Created organization Acme Corp.")
            .with_entity(EntityKind::Organization, json!({"id": "o1", "name": "Acme Corp"}))
            .with_detail("organization_id", json!("o1"))
            .finish(trace.into_steps());

        let json = report.to_json();
        assert_eq!(json["success"], true);
        assert_eq!(json["organization"]["name"], "Acme Corp");
        assert_eq!(json["details"]["organization_id"], "o1");
        assert_eq!(json["workflow_steps"][0]["step"], "initialize");
    }

    #[test]
    fn failure_report_serializes_code_and_existing() {
        let report = ToolReport::failure(
            FailureCode::DuplicateOrganization,
            "❌ An organization named Acme Corp already exists.",
        )
        .with_existing(EntityKind::Organization, json!({"id": "o1"}))
        .with_suggestion("Use the existing organization o1 instead of creating a new one.")
        .finish(Vec::new());

        let json = report.to_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "DUPLICATE_ORGANIZATION");
        assert_eq!(json["existing_organization"]["id"], "o1");
        assert!(json["suggestion"].as_str().unwrap().contains("existing"));
    }
}
