// ABOUTME: Organization mutation tools with duplicate detection and change diffing.
// ABOUTME: Implements create_organization and update_organization.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Organization Tools
//!
//! - `CreateOrganizationTool` - validated, duplicate-checked creation
//! - `UpdateOrganizationTool` - conflict-checked, diff-driven update
//!
//! Duplicate detection is a best-effort pre-check: the fetch-scan-create
//! sequence is not transactionally safe, and two racing creates can both
//! pass it. Stronger guarantees belong in the service layer.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::limits::CLOSE_MATCH_MIN_CHARS;
use crate::constants::tools as tool_names;
use crate::errors::AppResult;
use crate::models::{NewOrganization, Organization, OrganizationPatch};
use crate::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::report::{EntityKind, FailureCode, ToolReport};
use crate::tools::traits::{CrmTool, ToolCapabilities};
use crate::tools::workflow::WorkflowTrace;
use crate::utils::normalize_phone;

use super::{display_or_none, string_arg, uuid_arg};

/// Find an exact case-insensitive name match
fn find_exact_name_match<'a>(
    organizations: &'a [Organization],
    name: &str,
) -> Option<&'a Organization> {
    let needle = name.to_lowercase();
    organizations
        .iter()
        .find(|org| org.name.to_lowercase() == needle)
}

/// Collect close-match warnings: substring containment either direction,
/// excluding exact matches and names too short to be meaningful.
fn close_match_warnings(organizations: &[Organization], name: &str) -> Vec<String> {
    let needle = name.to_lowercase();
    organizations
        .iter()
        .filter(|org| {
            let existing = org.name.to_lowercase();
            existing != needle
                && existing.len() >= CLOSE_MATCH_MIN_CHARS
                && needle.len() >= CLOSE_MATCH_MIN_CHARS
                && (existing.contains(&needle) || needle.contains(&existing))
        })
        .map(|org| {
            format!(
                "An organization with a similar name already exists: \"{}\" ({})",
                org.name, org.id
            )
        })
        .collect()
}

// ============================================================================
// CreateOrganizationTool
// ============================================================================

/// Tool for creating an organization with duplicate detection
pub struct CreateOrganizationTool;

#[async_trait]
impl CrmTool for CreateOrganizationTool {
    fn name(&self) -> &'static str {
        tool_names::CREATE_ORGANIZATION
    }

    fn description(&self) -> &'static str {
        "Create a new organization in the CRM. Checks for duplicate names before creating and suggests reusing an existing record on an exact match."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("name", "string", "Organization name (required)"),
                ("domain", "string", "Primary web domain"),
                ("phone", "string", "Contact phone number"),
                ("address", "string", "Postal address"),
                ("industry", "string", "Industry label"),
                ("notes", "string", "Free-form notes"),
            ],
            &["name"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH
            | ToolCapabilities::WRITES_DATA
            | ToolCapabilities::ORGANIZATIONS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting organization creation (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to create an organization. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let Some(name) = string_arg(&args, "name") else {
            trace.failed("validation", "name is required");
            return Ok(ToolReport::failure(
                FailureCode::ValidationFailed,
                "❌ An organization needs a name. Please provide one and try again.",
            )
            .finish(trace.into_steps()));
        };
        trace.completed("validation", format!("Input valid for \"{name}\""));

        debug!(user_id = %user_id, name = %name, "Checking for duplicate organizations");

        let organizations = match ctx
            .services
            .organizations
            .list_organizations(user_id, token)
            .await
        {
            Ok(organizations) => organizations,
            Err(err) => {
                trace.failed("error", format!("Organization lookup failed: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::CreationFailed,
                    "❌ The organization could not be created because the CRM service is unavailable.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if let Some(existing) = find_exact_name_match(&organizations, &name) {
            trace.failed(
                "duplicate_check",
                format!("Exact name match on organization {}", existing.id),
            );
            return Ok(ToolReport::failure(
                FailureCode::DuplicateOrganization,
                format!("❌ An organization named \"{}\" already exists.", existing.name),
            )
            .with_existing(
                EntityKind::Organization,
                serde_json::to_value(existing)?,
            )
            .with_suggestion(format!(
                "Use the existing organization (id {}) instead of creating a duplicate.",
                existing.id
            ))
            .finish(trace.into_steps()));
        }

        let warnings = close_match_warnings(&organizations, &name);
        trace.completed(
            "duplicate_check",
            format!(
                "No exact duplicates among {} organizations ({} close matches)",
                organizations.len(),
                warnings.len()
            ),
        );

        let input = NewOrganization {
            name: name.clone(),
            domain: string_arg(&args, "domain"),
            phone: string_arg(&args, "phone").map(|p| normalize_phone(&p)),
            address: string_arg(&args, "address"),
            industry: string_arg(&args, "industry"),
            notes: string_arg(&args, "notes"),
        };

        let created = match ctx
            .services
            .organizations
            .create_organization(user_id, input, token)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                trace.failed("error", format!("Service rejected the creation: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::CreationFailed,
                    format!("❌ The organization \"{name}\" could not be created."),
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        // Success means the service persisted what we asked for, not merely
        // that it returned without error.
        if created.name != name {
            trace.failed(
                "error",
                format!("Service returned unexpected record {}", created.id),
            );
            return Ok(ToolReport::failure(
                FailureCode::CreationFailed,
                format!("❌ The CRM service returned an unexpected record while creating \"{name}\"."),
            )
            .finish(trace.into_steps()));
        }

        trace.completed_with_data(
            "organization_creation",
            format!("Created organization {}", created.id),
            json!({ "organization_id": created.id }),
        );

        Ok(ToolReport::success(format!("✅ Created organization \"{}\".", created.name))
            .with_entity(EntityKind::Organization, serde_json::to_value(&created)?)
            .with_detail("organization_id", json!(created.id))
            .with_detail("created_at", json!(created.created_at))
            .with_warnings(warnings)
            .finish(trace.into_steps()))
    }
}

// ============================================================================
// UpdateOrganizationTool
// ============================================================================

/// Tool for updating an organization with conflict detection and diffing
pub struct UpdateOrganizationTool;

#[async_trait]
impl CrmTool for UpdateOrganizationTool {
    fn name(&self) -> &'static str {
        tool_names::UPDATE_ORGANIZATION
    }

    fn description(&self) -> &'static str {
        "Update an existing organization. Only fields that actually differ are written; renaming checks for conflicts with other organizations."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("organization_id", "string", "Id of the organization to update (required)"),
                ("name", "string", "New organization name"),
                ("domain", "string", "New web domain"),
                ("phone", "string", "New contact phone number"),
                ("address", "string", "New postal address"),
                ("industry", "string", "New industry label"),
                ("notes", "string", "New notes"),
            ],
            &["organization_id"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH
            | ToolCapabilities::WRITES_DATA
            | ToolCapabilities::ORGANIZATIONS
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting organization update (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to update an organization. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let organization_id = match uuid_arg(&args, "organization_id") {
            Ok(Some(id)) => id,
            Ok(None) => {
                trace.failed("validation", "organization_id is required");
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    "❌ An organization id is required to update an organization.",
                )
                .finish(trace.into_steps()));
            }
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The organization id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        };
        trace.completed("validation", format!("Targeting organization {organization_id}"));

        let current = match ctx
            .services
            .organizations
            .get_organization(user_id, organization_id, token)
            .await
        {
            Ok(Some(current)) => current,
            Ok(None) => {
                trace.failed("error", format!("Organization {organization_id} not found"));
                return Ok(ToolReport::failure(
                    FailureCode::OrganizationNotFound,
                    format!("❌ No organization with id {organization_id} was found."),
                )
                .finish(trace.into_steps()));
            }
            Err(err) => {
                trace.failed("error", format!("Organization lookup failed: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    "❌ The organization could not be updated because the CRM service is unavailable.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        // Renaming is the one uniqueness-bearing change; check it against
        // every record other than the one being updated.
        let new_name = string_arg(&args, "name");
        if let Some(name) = &new_name {
            if name.to_lowercase() != current.name.to_lowercase() {
                let organizations = match ctx
                    .services
                    .organizations
                    .list_organizations(user_id, token)
                    .await
                {
                    Ok(organizations) => organizations,
                    Err(err) => {
                        trace.failed("error", format!("Conflict lookup failed: {err}"));
                        return Ok(ToolReport::failure(
                            FailureCode::UpdateFailed,
                            "❌ The organization could not be updated because the CRM service is unavailable.",
                        )
                        .with_details(json!({ "source": err.to_string() }))
                        .finish(trace.into_steps()));
                    }
                };

                if let Some(conflict) = find_exact_name_match(&organizations, name)
                    .filter(|org| org.id != organization_id)
                {
                    trace.failed(
                        "conflict_check",
                        format!("Name collides with organization {}", conflict.id),
                    );
                    return Ok(ToolReport::failure(
                        FailureCode::NameConflict,
                        format!(
                            "❌ Another organization is already named \"{}\".",
                            conflict.name
                        ),
                    )
                    .with_existing(EntityKind::Organization, serde_json::to_value(conflict)?)
                    .finish(trace.into_steps()));
                }
            }
            trace.completed("conflict_check", "No name conflicts");
        }

        let mut patch = OrganizationPatch::default();
        let mut changes = Vec::new();

        if let Some(name) = new_name {
            if name != current.name {
                changes.push(format!("name: {} → {}", current.name, name));
                patch.name = Some(name);
            }
        }
        if let Some(domain) = string_arg(&args, "domain") {
            if current.domain.as_deref() != Some(domain.as_str()) {
                changes.push(format!(
                    "domain: {} → {}",
                    display_or_none(current.domain.as_deref()),
                    domain
                ));
                patch.domain = Some(domain);
            }
        }
        if let Some(phone) = string_arg(&args, "phone") {
            // Normalize before diffing so a cosmetic reformat still counts
            // as a change when it alters the stored value.
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
        if let Some(address) = string_arg(&args, "address") {
            if current.address.as_deref() != Some(address.as_str()) {
                changes.push(format!(
                    "address: {} → {}",
                    display_or_none(current.address.as_deref()),
                    address
                ));
                patch.address = Some(address);
            }
        }
        if let Some(industry) = string_arg(&args, "industry") {
            if current.industry.as_deref() != Some(industry.as_str()) {
                changes.push(format!(
                    "industry: {} → {}",
                    display_or_none(current.industry.as_deref()),
                    industry
                ));
                patch.industry = Some(industry);
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
                "ℹ️ Organization \"{}\" already matches the requested values; nothing to update.",
                current.name
            ))
            .with_entity(EntityKind::Organization, serde_json::to_value(&current)?)
            .with_detail("changes_detected", json!(0))
            .finish(trace.into_steps()));
        }

        let updated = match ctx
            .services
            .organizations
            .update_organization(user_id, organization_id, patch, token)
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                trace.failed("error", format!("Service rejected the update: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    format!("❌ The organization \"{}\" could not be updated.", current.name),
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if updated.id != organization_id {
            trace.failed("error", "Service returned a different record");
            return Ok(ToolReport::failure(
                FailureCode::UpdateFailed,
                format!("❌ The CRM service returned an unexpected record while updating \"{}\".", current.name),
            )
            .finish(trace.into_steps()));
        }

        trace.completed_with_data(
            "organization_update",
            format!("Updated organization {organization_id}"),
            json!({ "changes_detected": changes.len() }),
        );

        Ok(ToolReport::success(format!(
            "✅ Updated organization \"{}\" ({} change{}).",
            updated.name,
            changes.len(),
            if changes.len() == 1 { "" } else { "s" }
        ))
        .with_entity(EntityKind::Organization, serde_json::to_value(&updated)?)
        .with_detail("changes_detected", json!(changes.len()))
        .with_detail("changes", json!(changes))
        .finish(trace.into_steps()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrganization;

    fn org(name: &str) -> Organization {
        Organization::new(NewOrganization {
            name: name.into(),
            ..NewOrganization::default()
        })
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let orgs = vec![org("Acme Corp")];
        assert!(find_exact_name_match(&orgs, "acme corp").is_some());
        assert!(find_exact_name_match(&orgs, "Acme").is_none());
    }

    #[test]
    fn close_matches_skip_short_names() {
        let orgs = vec![org("Coca-Cola")];
        // "Co" is contained in "Coca-Cola" but too short to be meaningful.
        assert!(close_match_warnings(&orgs, "Co").is_empty());
        assert_eq!(close_match_warnings(&orgs, "Cola").len(), 1);
    }
}
