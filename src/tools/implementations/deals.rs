// ABOUTME: Deal mutation tools with organization resolution and change diffing.
// ABOUTME: Implements create_deal and update_deal.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Deal Tools
//!
//! - `CreateDealTool` - validated creation; resolves the owning
//!   organization and warns about an existing open deal with the same name
//! - `UpdateDealTool` - diff-driven update across every updatable field

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::tools as tool_names;
use crate::errors::AppResult;
use crate::models::{DealPatch, DealStage, NewDeal};
use crate::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::report::{EntityKind, FailureCode, ToolReport};
use crate::tools::traits::{CrmTool, ToolCapabilities};
use crate::tools::workflow::WorkflowTrace;
use crate::utils::format_amount;

use super::{date_arg, display_or_none, number_arg, string_arg, uuid_arg};

// ============================================================================
// CreateDealTool
// ============================================================================

/// Tool for creating a deal
pub struct CreateDealTool;

#[async_trait]
impl CrmTool for CreateDealTool {
    fn name(&self) -> &'static str {
        tool_names::CREATE_DEAL
    }

    fn description(&self) -> &'static str {
        "Create a new deal in the CRM. Resolves the owning organization when one is given and warns if an open deal with the same name already exists for it."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("name", "string", "Deal title (required)"),
                ("amount", "number", "Monetary value of the deal"),
                ("stage", "string", "Pipeline stage: lead, qualified, proposal, negotiation, closed_won, closed_lost"),
                ("organization_id", "string", "Id of the associated organization"),
                ("contact_id", "string", "Id of the primary contact"),
                ("expected_close_date", "string", "Expected close date (YYYY-MM-DD)"),
                ("notes", "string", "Free-form notes"),
            ],
            &["name"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH | ToolCapabilities::WRITES_DATA | ToolCapabilities::DEALS
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting deal creation (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to create a deal. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let Some(name) = string_arg(&args, "name") else {
            trace.failed("validation", "name is required");
            return Ok(ToolReport::failure(
                FailureCode::ValidationFailed,
                "❌ A deal needs a name. Please provide one and try again.",
            )
            .finish(trace.into_steps()));
        };

        let amount = number_arg(&args, "amount");
        if amount.is_some_and(|a| a < 0.0) {
            trace.failed("validation", "amount must be non-negative");
            return Ok(ToolReport::failure(
                FailureCode::ValidationFailed,
                "❌ A deal amount cannot be negative.",
            )
            .finish(trace.into_steps()));
        }

        let stage = match string_arg(&args, "stage") {
            Some(raw) => match raw.parse::<DealStage>() {
                Ok(stage) => Some(stage),
                Err(err) => {
                    trace.failed("validation", err.to_string());
                    return Ok(ToolReport::failure(
                        FailureCode::ValidationFailed,
                        format!("❌ {}.", err.message),
                    )
                    .finish(trace.into_steps()));
                }
            },
            None => None,
        };

        let expected_close_date = match date_arg(&args, "expected_close_date") {
            Ok(date) => date,
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The expected close date is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        };

        let (organization_id, contact_id) =
            match (uuid_arg(&args, "organization_id"), uuid_arg(&args, "contact_id")) {
                (Ok(org), Ok(contact)) => (org, contact),
                (Err(reason), _) | (_, Err(reason)) => {
                    trace.failed("validation", reason.clone());
                    return Ok(ToolReport::failure(
                        FailureCode::ValidationFailed,
                        format!("❌ The referenced id is not valid: {reason}."),
                    )
                    .finish(trace.into_steps()));
                }
            };
        trace.completed("validation", format!("Input valid for \"{name}\""));

        // A deal attached to an organization must point at a real record.
        let mut warnings = Vec::new();
        if let Some(org_id) = organization_id {
            debug!(user_id = %user_id, organization_id = %org_id, "Resolving deal organization");

            match ctx.services.organizations.get_organization(user_id, org_id, token).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    trace.failed("duplicate_check", format!("Organization {org_id} not found"));
                    return Ok(ToolReport::failure(
                        FailureCode::OrganizationNotFound,
                        format!("❌ No organization with id {org_id} was found to attach the deal to."),
                    )
                    .finish(trace.into_steps()));
                }
                Err(err) => {
                    trace.failed("error", format!("Organization lookup failed: {err}"));
                    return Ok(ToolReport::failure(
                        FailureCode::CreationFailed,
                        "❌ The deal could not be created because the CRM service is unavailable.",
                    )
                    .with_details(json!({ "source": err.to_string() }))
                    .finish(trace.into_steps()));
                }
            }

            match ctx.services.deals.list_deals(user_id, token).await {
                Ok(deals) => {
                    let needle = name.to_lowercase();
                    warnings.extend(
                        deals
                            .iter()
                            .filter(|deal| {
                                deal.organization_id == Some(org_id)
                                    && deal.stage.is_open()
                                    && deal.name.to_lowercase() == needle
                            })
                            .map(|deal| {
                                format!(
                                    "An open deal named \"{}\" already exists for this organization ({})",
                                    deal.name, deal.id
                                )
                            }),
                    );
                }
                Err(err) => {
                    trace.failed("error", format!("Deal lookup failed: {err}"));
                    return Ok(ToolReport::failure(
                        FailureCode::CreationFailed,
                        "❌ The deal could not be created because the CRM service is unavailable.",
                    )
                    .with_details(json!({ "source": err.to_string() }))
                    .finish(trace.into_steps()));
                }
            }
        }
        trace.completed(
            "duplicate_check",
            format!("References resolved ({} warnings)", warnings.len()),
        );

        let input = NewDeal {
            name: name.clone(),
            amount,
            stage,
            organization_id,
            contact_id,
            expected_close_date,
            notes: string_arg(&args, "notes"),
        };

        let created = match ctx.services.deals.create_deal(user_id, input, token).await {
            Ok(created) => created,
            Err(err) => {
                trace.failed("error", format!("Service rejected the creation: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::CreationFailed,
                    format!("❌ The deal \"{name}\" could not be created."),
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if created.name != name {
            trace.failed("error", format!("Service returned unexpected record {}", created.id));
            return Ok(ToolReport::failure(
                FailureCode::CreationFailed,
                format!("❌ The CRM service returned an unexpected record while creating \"{name}\"."),
            )
            .finish(trace.into_steps()));
        }

        trace.completed_with_data(
            "deal_creation",
            format!("Created deal {}", created.id),
            json!({ "deal_id": created.id }),
        );

        let message = created.amount.map_or_else(
            || format!("✅ Created deal \"{}\".", created.name),
            |amount| format!("✅ Created deal \"{}\" worth ${}.", created.name, format_amount(amount)),
        );

        Ok(ToolReport::success(message)
            .with_entity(EntityKind::Deal, serde_json::to_value(&created)?)
            .with_detail("deal_id", json!(created.id))
            .with_detail("stage", json!(created.stage))
            .with_detail("created_at", json!(created.created_at))
            .with_warnings(warnings)
            .finish(trace.into_steps()))
    }
}

// ============================================================================
// UpdateDealTool
// ============================================================================

/// Tool for updating a deal with change diffing
pub struct UpdateDealTool;

#[async_trait]
impl CrmTool for UpdateDealTool {
    fn name(&self) -> &'static str {
        tool_names::UPDATE_DEAL
    }

    fn description(&self) -> &'static str {
        "Update an existing deal. Only fields that actually differ are written; a no-op update issues no write at all."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("deal_id", "string", "Id of the deal to update (required)"),
                ("name", "string", "New deal title"),
                ("amount", "number", "New monetary value"),
                ("stage", "string", "New pipeline stage"),
                ("organization_id", "string", "New associated organization id"),
                ("contact_id", "string", "New primary contact id"),
                ("expected_close_date", "string", "New expected close date (YYYY-MM-DD)"),
                ("notes", "string", "New notes"),
            ],
            &["deal_id"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REQUIRES_AUTH | ToolCapabilities::WRITES_DATA | ToolCapabilities::DEALS
    }

    #[allow(clippy::too_many_lines)]
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Starting deal update (request {})", ctx.request_id),
        );

        let Some((user_id, token)) = ctx.credentials() else {
            trace.failed("error", "Caller credentials are missing");
            return Ok(ToolReport::failure(
                FailureCode::AuthRequired,
                "🔒 Authentication is required to update a deal. Please sign in and try again.",
            )
            .finish(trace.into_steps()));
        };

        let deal_id = match uuid_arg(&args, "deal_id") {
            Ok(Some(id)) => id,
            Ok(None) => {
                trace.failed("validation", "deal_id is required");
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    "❌ A deal id is required to update a deal.",
                )
                .finish(trace.into_steps()));
            }
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The deal id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        };
        trace.completed("validation", format!("Targeting deal {deal_id}"));

        let current = match ctx.services.deals.get_deal(user_id, deal_id, token).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                trace.failed("error", format!("Deal {deal_id} not found"));
                return Ok(ToolReport::failure(
                    FailureCode::DealNotFound,
                    format!("❌ No deal with id {deal_id} was found."),
                )
                .finish(trace.into_steps()));
            }
            Err(err) => {
                trace.failed("error", format!("Deal lookup failed: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    "❌ The deal could not be updated because the CRM service is unavailable.",
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        let mut patch = DealPatch::default();
        let mut changes = Vec::new();

        if let Some(name) = string_arg(&args, "name") {
            if name != current.name {
                changes.push(format!("name: {} → {}", current.name, name));
                patch.name = Some(name);
            }
        }
        if let Some(amount) = number_arg(&args, "amount") {
            if amount < 0.0 {
                trace.failed("validation", "amount must be non-negative");
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    "❌ A deal amount cannot be negative.",
                )
                .finish(trace.into_steps()));
            }
            if current.amount != Some(amount) {
                changes.push(format!(
                    "amount: {} → ${}",
                    current
                        .amount
                        .map_or_else(|| "(none)".to_owned(), |a| format!("${}", format_amount(a))),
                    format_amount(amount)
                ));
                patch.amount = Some(amount);
            }
        }
        if let Some(raw) = string_arg(&args, "stage") {
            match raw.parse::<DealStage>() {
                Ok(stage) => {
                    if stage != current.stage {
                        changes.push(format!("stage: {} → {}", current.stage, stage));
                        patch.stage = Some(stage);
                    }
                }
                Err(err) => {
                    trace.failed("validation", err.to_string());
                    return Ok(ToolReport::failure(
                        FailureCode::ValidationFailed,
                        format!("❌ {}.", err.message),
                    )
                    .finish(trace.into_steps()));
                }
            }
        }
        match uuid_arg(&args, "organization_id") {
            Ok(Some(organization_id)) => {
                if current.organization_id != Some(organization_id) {
                    // The new owning organization must resolve before the
                    // deal is re-attached to it.
                    match ctx
                        .services
                        .organizations
                        .get_organization(user_id, organization_id, token)
                        .await
                    {
                        Ok(Some(_)) => {
                            changes.push(format!(
                                "organization_id: {} → {}",
                                current
                                    .organization_id
                                    .map_or_else(|| "(none)".to_owned(), |id| id.to_string()),
                                organization_id
                            ));
                            patch.organization_id = Some(organization_id);
                        }
                        Ok(None) => {
                            trace.failed(
                                "error",
                                format!("Organization {organization_id} not found"),
                            );
                            return Ok(ToolReport::failure(
                                FailureCode::OrganizationNotFound,
                                format!(
                                    "❌ No organization with id {organization_id} was found to attach the deal to."
                                ),
                            )
                            .finish(trace.into_steps()));
                        }
                        Err(err) => {
                            trace.failed("error", format!("Organization lookup failed: {err}"));
                            return Ok(ToolReport::failure(
                                FailureCode::UpdateFailed,
                                "❌ The deal could not be updated because the CRM service is unavailable.",
                            )
                            .with_details(json!({ "source": err.to_string() }))
                            .finish(trace.into_steps()));
                        }
                    }
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
        match uuid_arg(&args, "contact_id") {
            Ok(Some(contact_id)) => {
                if current.contact_id != Some(contact_id) {
                    changes.push(format!(
                        "contact_id: {} → {}",
                        current
                            .contact_id
                            .map_or_else(|| "(none)".to_owned(), |id| id.to_string()),
                        contact_id
                    ));
                    patch.contact_id = Some(contact_id);
                }
            }
            Ok(None) => {}
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The contact id is not valid: {reason}."),
                )
                .finish(trace.into_steps()));
            }
        }
        match date_arg(&args, "expected_close_date") {
            Ok(Some(date)) => {
                if current.expected_close_date != Some(date) {
                    changes.push(format!(
                        "expected_close_date: {} → {}",
                        current
                            .expected_close_date
                            .map_or_else(|| "(none)".to_owned(), |d| d.to_string()),
                        date
                    ));
                    patch.expected_close_date = Some(date);
                }
            }
            Ok(None) => {}
            Err(reason) => {
                trace.failed("validation", reason.clone());
                return Ok(ToolReport::failure(
                    FailureCode::ValidationFailed,
                    format!("❌ The expected close date is not valid: {reason}."),
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
                "ℹ️ Deal \"{}\" already matches the requested values; nothing to update.",
                current.name
            ))
            .with_entity(EntityKind::Deal, serde_json::to_value(&current)?)
            .with_detail("changes_detected", json!(0))
            .finish(trace.into_steps()));
        }

        let updated = match ctx
            .services
            .deals
            .update_deal(user_id, deal_id, patch, token)
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                trace.failed("error", format!("Service rejected the update: {err}"));
                return Ok(ToolReport::failure(
                    FailureCode::UpdateFailed,
                    format!("❌ The deal \"{}\" could not be updated.", current.name),
                )
                .with_details(json!({ "source": err.to_string() }))
                .finish(trace.into_steps()));
            }
        };

        if updated.id != deal_id {
            trace.failed("error", "Service returned a different record");
            return Ok(ToolReport::failure(
                FailureCode::UpdateFailed,
                format!("❌ The CRM service returned an unexpected record while updating \"{}\".", current.name),
            )
            .finish(trace.into_steps()));
        }

        trace.completed_with_data(
            "deal_update",
            format!("Updated deal {deal_id}"),
            json!({ "changes_detected": changes.len() }),
        );

        Ok(ToolReport::success(format!(
            "✅ Updated deal \"{}\" ({} change{}).",
            updated.name,
            changes.len(),
            if changes.len() == 1 { "" } else { "s" }
        ))
        .with_entity(EntityKind::Deal, serde_json::to_value(&updated)?)
        .with_detail("changes_detected", json!(changes.len()))
        .with_detail("changes", json!(changes))
        .finish(trace.into_steps()))
    }
}
