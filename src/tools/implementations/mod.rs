// ABOUTME: Built-in tool implementations: CRM mutation tools and the think tool.
// ABOUTME: Shared argument-extraction helpers for JSON tool inputs live here.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Built-in Tools
//!
//! - [`organizations`] - `create_organization`, `update_organization`
//! - [`people`] - `create_person`, `update_person`
//! - [`deals`] - `create_deal`, `update_deal`
//! - [`think`] - `think`, structured reasoning capture

pub mod deals;
pub mod organizations;
pub mod people;
pub mod think;

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use super::traits::CrmTool;

/// Create the CRM mutation tools for registration
#[must_use]
pub fn create_crm_tools() -> Vec<Box<dyn CrmTool>> {
    vec![
        Box::new(organizations::CreateOrganizationTool),
        Box::new(organizations::UpdateOrganizationTool),
        Box::new(people::CreatePersonTool),
        Box::new(people::UpdatePersonTool),
        Box::new(deals::CreateDealTool),
        Box::new(deals::UpdateDealTool),
    ]
}

/// Create the reasoning tools for registration
#[must_use]
pub fn create_reasoning_tools() -> Vec<Box<dyn CrmTool>> {
    vec![Box::new(think::ThinkTool)]
}

/// Extract a trimmed, non-empty string argument
pub(crate) fn string_arg(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Extract a UUID argument. `Ok(None)` when absent; `Err` with a reason
/// when present but malformed.
pub(crate) fn uuid_arg(args: &Value, key: &str) -> Result<Option<Uuid>, String> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<Uuid>()
            .map(Some)
            .map_err(|_| format!("{key} must be a valid UUID, got '{raw}'")),
    }
}

/// Extract a numeric argument, accepting JSON numbers or numeric strings
pub(crate) fn number_arg(args: &Value, key: &str) -> Option<f64> {
    match args.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace([',', '$'], "").parse().ok(),
        _ => None,
    }
}

/// Extract an ISO date (`YYYY-MM-DD`) argument. `Ok(None)` when absent;
/// `Err` with a reason when present but malformed.
pub(crate) fn date_arg(args: &Value, key: &str) -> Result<Option<NaiveDate>, String> {
    match args.get(key).and_then(Value::as_str) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{key} must be an ISO date (YYYY-MM-DD), got '{raw}'")),
    }
}

/// Render an optional field for a human-readable change line
pub(crate) fn display_or_none(value: Option<&str>) -> String {
    value.map_or_else(|| "(none)".to_owned(), str::to_owned)
}
