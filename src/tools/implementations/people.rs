// ABOUTME: Person mutation tools with duplicate detection and change diffing.
// ABOUTME: Implements create_person and update_person.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Person Tools
//!
//! - `CreatePersonTool` - validated, duplicate-checked creation; email is
//!   the uniqueness-bearing field
//! - `UpdatePersonTool` - conflict-checked, diff-driven update

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::limits::CLOSE_MATCH_MIN_CHARS;
use crate::constants::tools as tool_names;
use crate::errors::AppResult;
use crate::models::{NewPerson, Person, PersonPatch};
use crate::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::report::{EntityKind, FailureCode, ToolReport};
use crate::tools::traits::{CrmTool, ToolCapabilities};
use crate::tools::workflow::WorkflowTrace;
use crate::utils::normalize_phone;

use super::{display_or_none, string_arg, uuid_arg};

/// Find an exact case-insensitive email match
fn find_exact_email_match<'a>(people: &'a [Person], email: &str) -> Option<&'a Person> {
    let needle = email.to_lowercase();
    people
        .iter()
        .find(|person| person.email.as_deref().is_some_and(|e| e.to_lowercase() == needle))
}

/// Collect close-match warnings on display names
fn close_match_warnings(people: &[Person], display_name: &str) -> Vec<String> {
    let needle = display_name.to_lowercase();
    if needle.len() < CLOSE_MATCH_MIN_CHARS {
        return Vec::new();
    }
    people
        .iter()
        .filter(|person| {
            let existing = person.display_name().to_lowercase();
            existing != needle
                && existing.len() >= CLOSE_MATCH_MIN_CHARS
                && (existing.contains(&needle) || needle.contains(&existing))
        })
        .map(|person| {
            format!(
                "A contact with a similar name already exists: \"{}\" ({})",
                person.display_name(),
                person.id
            )
        })
        .collect()
}

// ============================================================================
// CreatePersonTool
// ============================================================================

/// Tool for creating a person with duplicate detection
pub struct CreatePersonTool;

#[async_trait]
impl CrmTool for CreatePersonTool {
    fn name(&self) -> &'static str {
        tool_names::CREATE_PERSON
    }

    fn description(&self) -> &'static str {
        "Create a new contact in the CRM. Requires at least a first name, last name, or email; checks for an existing contact with the same email."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("first_name", "string", "Given name"),
                ("last_name", "string", "Family name"),
                ("email", "string", "Email address"),
                ("phone", "string", "Phone number"),
                ("job_title", "string", "Job title"),
                ("organization_id", "string", "Id of the organization this contact belongs to"),
                ("notes", "string", "Free-form notes"),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH | ToolCapabilities::WRITES_DATA | ToolCapabilities::PEOPLE
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting person creation (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to create a contact. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let organization_id = match uuid_arg(&args, "organization_id") {
            Ok(id) => id,
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The organization id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        };

        let input = NewPerson {
            first_name: string_arg(&args, "first_name"),
            last_name: string_arg(&args, "last_name"),
            email: string_arg(&args, "email"),
            phone: string_arg(&args, "phone").map(|p| normalize_phone(&p)),
            job_title: string_arg(&args, "job_title"),
            organization_id,
            notes: string_arg(&args, "notes"),
        };

        if !input.has_identity() {
            trace.failed("validation", "No identifying field provided");
            return Ok(ToolReport::failure(
                FailureCode::ValidationFailed,
                "❌ A contact needs at least a first name, last name, or email address.",
            )
            .finish(trace.into_steps()));
        }
        trace.completed("validation", "Input has an identifying field");

        debug!(user_id = %user_id, "Checking for duplicate contacts");

        let people = match ctx.services.people.list_people(user_id, token).await {
            Ok(people) => people,
            Err(err) => {
                trace.failed("error", format!("Contact lookup failed: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::CreationFailed,
                    "❌ The contact could not be created because the CRM service is unavailable.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if let Some(email) = &input.email {
            if let Some(existing) = find_exact_email_match(&people, email) {
                trace.failed(
                    "duplicate_check",
                    format!("Exact email match on person {}", existing.id),
                );
                return Ok(ToolReport::failure(
                    FailureCode::DuplicatePerson,
                    format!(
                        "❌ A contact with the email {} already exists: {}.",
                        email,
                        existing.display_name()
                    ),
                )
                .with_existing(EntityKind::Person, serde_json::to_value(existing)?)
                .with_suggestion(format!(
                    "Use the existing contact (id {}) instead of creating a duplicate.",
                    existing.id
                ))
                .finish(trace.into_steps()));
            }
        }

        let candidate_name = match (&input.first_name, &input.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        };
        let warnings = close_match_warnings(&people, &candidate_name);
        trace.completed(
            "duplicate_check",
            format!(
                "No exact duplicates among {} contacts ({} close matches)",
                people.len(),
                warnings.len()
            ),
        );

        let created = match ctx.services.people.create_person(user_id, input, token).await {
            Ok(created) => created,
            Err(err) => {
                trace.failed("error", format!("Service rejected the creation: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::CreationFailed,
                    "❌ The contact could not be created.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        trace.completed_with_data(
            "person_creation",
            format!("Created person {}", created.id),
            json!({ "person_id": created.id }),
        );

        Ok(ToolReport::success(format!("✅ Created contact {}.", created.display_name()))
            .with_entity(EntityKind::Person, serde_json::to_value(&created)?)
            .with_detail("person_id", json!(created.id))
            .with_detail("created_at", json!(created.created_at))
            .with_warnings(warnings)
            .finish(trace.into_steps()))
    }
}

// ============================================================================
// UpdatePersonTool
// ============================================================================

/// Tool for updating a person with conflict detection and diffing
pub struct UpdatePersonTool;

#[async_trait]
impl CrmTool for UpdatePersonTool {
    fn name(&self) -> &'static str {
        tool_names::UPDATE_PERSON
    }

    fn description(&self) -> &'static str {
        "Update an existing contact. Only fields that actually differ are written; changing the email checks for conflicts with other contacts."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("person_id", "string", "Id of the contact to update (required)"),
                ("first_name", "string", "New given name"),
                ("last_name", "string", "New family name"),
                ("email", "string", "New email address"),
                ("phone", "string", "New phone number"),
                ("job_title", "string", "New job title"),
                ("organization_id", "string", "New owning organization id"),
                ("notes", "string", "New notes"),
            ],
            &["person_id"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH | ToolCapabilities::WRITES_DATA | ToolCapabilities::PEOPLE
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting person update (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to update a contact. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let person_id = match uuid_arg(&args, "person_id") {
            Ok(Some(id)) => id,
            Ok(None) => {
                trace.failed("validation", "person_id is required");
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    "❌ A contact id is required to update a contact.",
                )
                .finish(trace.into_steps()));
            }
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The contact id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        };
        trace.completed("validation", format!("Targeting person {person_id}"));

        let current = match ctx.services.people.get_person(user_id, person_id, token).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                trace.failed("error", format!("Person {person_id} not found"));
                return Ok(ToolReport::failure(
                    FailureCode::PersonNotFound,
                    format!("❌ No contact with id {person_id} was found."),
                )
                .finish(trace.into_steps()));
            }
            Err(err) => {
                trace.failed("error", format!("Person lookup failed: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    "❌ The contact could not be updated because the CRM service is unavailable.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        // Email is the uniqueness-bearing field; a change must not collide
        // with any record other than the one being updated.
        let new_email = string_arg(&args, "email");
        if let Some(email) = &new_email {
            let differs = current
                .email
                .as_deref()
                .is_none_or(|e| e.to_lowercase() != email.to_lowercase());
            if differs {
                let people = match ctx.services.people.list_people(user_id, token).await {
                    Ok(people) => people,
                    Err(err) => {
                        trace.failed("error", format!("Conflict lookup failed: {err}"));
                        return Ok(ToolReport::failure(
                            FailureCode::UpdateFailed,
                            "❌ The contact could not be updated because the CRM service is unavailable.",
                        )
                        .with_details(json!({ "source": err.to_string() }))
                        .finish(trace.into_steps()));
                    }
                };

                if let Some(conflict) =
                    find_exact_email_match(&people, email).filter(|p| p.id != person_id)
                {
                    trace.failed(
                        "conflict_check",
                        format!("Email collides with person {}", conflict.id),
                    );
                    return Ok(ToolReport::failure(
                        FailureCode::EmailConflict,
                        format!(
                            "❌ The email {} already belongs to {}.",
                            email,
                            conflict.display_name()
                        ),
                    )
                    .with_existing(EntityKind::Person, serde_json::to_value(conflict)?)
                    .finish(trace.into_steps()));
                }
            }
            trace.completed("conflict_check", "No email conflicts");
        }

        let mut patch = PersonPatch::default();
        let mut changes = Vec::new();

        if let Some(first_name) = string_arg(&args, "first_name") {
            if current.first_name.as_deref() != Some(first_name.as_str()) {
                changes.push(format!(
                    "first_name: {} → {}",
                    display_or_none(current.first_name.as_deref()),
                    first_name
                ));
                patch.first_name = Some(first_name);
            }
        }
        if let Some(last_name) = string_arg(&args, "last_name") {
            if current.last_name.as_deref() != Some(last_name.as_str()) {
                changes.push(format!(
                    "last_name: {} → {}",
                    display_or_none(current.last_name.as_deref()),
                    last_name
                ));
                patch.last_name = Some(last_name);
            }
        }
        if let Some(email) = new_email {
            if current.email.as_deref() != Some(email.as_str()) {
                changes.push(format!(
                    "email: {} → {}",
                    display_or_none(current.email.as_deref()),
                    email
                ));
                patch.email = Some(email);
            }
        }
        if let Some(phone) = string_arg(&args, "phone") {
            let normalized = normalize_phone(&phone);
            if current.phone.as_deref() != Some(normalized.as_str()) {
                changes.push(format!(
                    "phone: {} → {}",
                    display_or_none(current.phone.as_deref()),
                    normalized
                ));
                patch.phone = Some(normalized);
            }
        }
        if let Some(job_title) = string_arg(&args, "job_title") {
            if current.job_title.as_deref() != Some(job_title.as_str()) {
                changes.push(format!(
                    "job_title: {} → {}",
                    display_or_none(current.job_title.as_deref()),
                    job_title
                ));
                patch.job_title = Some(job_title);
            }
        }
        match uuid_arg(&args, "organization_id") {
            Ok(Some(organization_id)) => {
                if current.organization_id != Some(organization_id) {
                    changes.push(format!(
                        "organization_id: {} → {}",
                        current
                            .organization_id
                            .map_or_else(|| "(none)".to_owned(), |id| id.to_string()),
                        organization_id
                    ));
                    patch.organization_id = Some(organization_id);
                }
            }
            Ok(None) => {}
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The organization id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        }
        if let Some(notes) = string_arg(&args, "notes") {
            if current.notes.as_deref() != Some(notes.as_str()) {
                changes.push(format!(
                    "notes: {} → {}",
                    display_or_none(current.notes.as_deref()),
                    notes
                ));
                patch.notes = Some(notes);
            }
        }

        trace.completed_with_data(
            "change_analysis",
            format!("{} field(s) differ", changes.len()),
            json!({ "changes": changes }),
        );

        if patch.is_empty() {
            return Ok(ToolReport::success(format!(
                "ℹ️ Contact {} already matches the requested values; nothing to update.",
                current.display_name()
            ))
            .with_entity(EntityKind::Person, serde_json::to_value(&current)?)
            .with_detail("changes_detected", json!(0))
            .finish(trace.into_steps()));
        }

        let updated = match ctx
            .services
            .people
            .update_person(user_id, person_id, patch, token)
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                trace.failed("error", format!("Service rejected the update: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    format!("❌ The contact {} could not be updated.", current.display_name()),
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if updated.id != person_id {
            trace.failed("error", "Service returned a different record");
            return Ok(ToolReport::failure(
                FailureCode::UpdateFailed,
                format!(
                    "❌ The CRM service returned an unexpected record while updating {}.",
                    current.display_name()
                ),
            )
            .finish(trace.into_steps()));
        }

        trace.completed_with_data(
            "person_update",
            format!("Updated person {person_id}"),
            json!({ "changes_detected": changes.len() }),
        );

        Ok(ToolReport::success(format!(
            "✅ Updated contact {} ({} change{}).",
            updated.display_name(),
            changes.len(),
            if changes.len() == 1 { "" } else { "s" }
        ))
        .with_entity(EntityKind::Person, serde_json::to_value(&updated)?)
        .with_detail("changes_detected", json!(changes.len()))
        .with_detail("changes", json!(changes))
        .finish(trace.into_steps()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPerson;

    fn person(first: &str, email: Option<&str>) -> Person {
        Person::new(NewPerson {
            first_name: Some(first.into()),
            email: email.map(str::to_owned),
            ..NewPerson::default()
        })
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let people = vec![person("Ada", Some("Ada@Example.com"))];
        assert!(find_exact_email_match(&people, "ada@example.com").is_some());
        assert!(find_exact_email_match(&people, "other@example.com").is_none());
    }

    #[test]
    fn close_matches_use_display_names() {
        let people = vec![person("Alexandra", None)];
        assert_eq!(close_match_warnings(&people, "Alex").len(), 1);
        assert!(close_match_warnings(&people, "Al").is_empty());
    }
}
