// ABOUTME: Actionable-data extraction and suggested-action synthesis for one turn.
// ABOUTME: Regex scanning of free text plus entity-driven action generation with id dedup.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Actionable Data and Suggested Actions
//!
//! Two derivations over a turn:
//!
//! - **Actionable data** scans the free-text response (not the tool
//!   payloads) for copyable fragments: UUIDs and currency amounts above a
//!   noise floor.
//! - **Suggested actions** emit a fixed, entity-type-specific action set per
//!   detected entity (deal → View/Edit, organization → View/Add-Contact,
//!   contact → View) plus two context-sensitive actions keyed off simple
//!   keyword checks on the response text.
//!
//! Every action carries a stable id (`<verb>-<type>-<id>`) *and* an explicit
//! `entity_id`, so consumers correlate actions to entities by equality -
//! never by substring containment of one id in another.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::limits::ACTIONABLE_AMOUNT_FLOOR;

use super::entities::{DetectedEntity, DetectedEntityType};

/// What dispatching an action should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Navigate to `target`
    Navigate,
    /// Copy `payload.value` to the clipboard
    Copy,
    /// Open a creation flow
    Create,
    /// Open an edit flow
    Edit,
    /// Open a read-only view
    View,
    /// Place a call
    Call,
}

/// A copyable data fragment extracted from free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionableData {
    /// Fragment kind (`id`, `amount`)
    #[serde(rename = "type")]
    pub data_type: String,
    /// The fragment value
    pub value: Value,
    /// Display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the UI should offer a copy affordance
    pub copyable: bool,
}

/// A proposed next step tied to an entity or to the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Stable id, `<verb>-<type>-<id>`; unique per parse pass
    pub id: String,
    /// Button label
    pub label: String,
    /// Icon hint for the UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Styling variant hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// What dispatching the action does
    pub action: ActionKind,
    /// Navigation target for `navigate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Structured payload (copy value, prefill data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// The detected entity this action belongs to; equality join, not
    /// substring matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Whether the action is currently disabled
    #[serde(default)]
    pub disabled: bool,
    /// Tooltip text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

fn uuid_regex() -> &'static Regex {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    UUID_RE.get_or_init(|| {
        Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .expect("uuid regex is valid")
    })
}

fn currency_regex() -> &'static Regex {
    static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();
    CURRENCY_RE.get_or_init(|| {
        Regex::new(r"\$\s?[0-9][0-9,]*(?:\.[0-9]{1,2})?|\b[0-9]{3,}(?:\.[0-9]{1,2})?\b")
            .expect("currency regex is valid")
    })
}

/// Extract copyable fragments from the free-text response.
#[must_use]
pub fn extract_actionable_data(text: &str) -> Vec<ActionableData> {
    let mut data = Vec::new();
    let mut seen = HashSet::new();

    for m in uuid_regex().find_iter(text) {
        let value = m.as_str().to_lowercase();
        if seen.insert(value.clone()) {
            data.push(ActionableData {
                data_type: "id".into(),
                value: Value::String(value),
                label: Some("Record id".into()),
                copyable: true,
            });
        }
    }

    for m in currency_regex().find_iter(text) {
        let raw = m.as_str();
        // UUID segments also look like bare numbers; skip anything that sits
        // inside an already-captured id.
        if seen.contains(&raw.to_lowercase()) {
            continue;
        }
        let Ok(amount) = raw.trim_start_matches('$').trim().replace(',', "").parse::<f64>() else {
            continue;
        };
        if amount <= ACTIONABLE_AMOUNT_FLOOR {
            continue;
        }
        let key = format!("amount:{amount}");
        if seen.insert(key) {
            data.push(ActionableData {
                data_type: "amount".into(),
                value: json!(amount),
                label: Some(format!("Amount {raw}")),
                copyable: true,
            });
        }
    }

    data
}

/// Keywords suggesting the turn created something
const CREATION_KEYWORDS: &[&str] = &["created", "added", "new deal", "new organization"];
/// Keywords suggesting the turn searched for something
const SEARCH_KEYWORDS: &[&str] = &["found", "search", "matching", "results"];

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let haystack = text.to_lowercase();
    keywords.iter().any(|k| haystack.contains(k))
}

/// Build the fixed action set for one detected entity
fn actions_for_entity(entity: &DetectedEntity) -> Vec<SuggestedAction> {
    let id = &entity.id;
    match entity.entity_type {
        DetectedEntityType::Deal => vec![
            SuggestedAction {
                id: format!("view-deal-{id}"),
                label: "View Deal".into(),
                icon: Some("eye".into()),
                variant: Some("primary".into()),
                action: ActionKind::Navigate,
                target: Some(format!("/deals/{id}")),
                payload: None,
                entity_id: Some(id.clone()),
                disabled: false,
                tooltip: entity.name.as_ref().map(|n| format!("Open {n}")),
            },
            SuggestedAction {
                id: format!("edit-deal-{id}"),
                label: "Edit Deal".into(),
                icon: Some("pencil".into()),
                variant: None,
                action: ActionKind::Edit,
                target: Some(format!("/deals/{id}/edit")),
                payload: None,
                entity_id: Some(id.clone()),
                disabled: false,
                tooltip: None,
            },
        ],
        DetectedEntityType::Organization => vec![
            SuggestedAction {
                id: format!("view-organization-{id}"),
                label: "View Organization".into(),
                icon: Some("building".into()),
                variant: Some("primary".into()),
                action: ActionKind::Navigate,
                target: Some(format!("/organizations/{id}")),
                payload: None,
                entity_id: Some(id.clone()),
                disabled: false,
                tooltip: entity.name.as_ref().map(|n| format!("Open {n}")),
            },
            SuggestedAction {
                id: format!("create-contact-{id}"),
                label: "Add Contact".into(),
                icon: Some("user-plus".into()),
                variant: None,
                action: ActionKind::Create,
                target: None,
                payload: Some(json!({ "organization_id": id })),
                entity_id: Some(id.clone()),
                disabled: false,
                tooltip: Some("Add a contact to this organization".into()),
            },
        ],
        DetectedEntityType::Contact => vec![SuggestedAction {
            id: format!("view-contact-{id}"),
            label: "View Contact".into(),
            icon: Some("user".into()),
            variant: Some("primary".into()),
            action: ActionKind::Navigate,
            target: Some(format!("/people/{id}")),
            payload: None,
            entity_id: Some(id.clone()),
            disabled: false,
            tooltip: None,
        }],
        DetectedEntityType::Activity => Vec::new(),
    }
}

/// Generate the deduplicated suggested-action list for a turn.
#[must_use]
pub fn generate_suggested_actions(
    entities: &[DetectedEntity],
    text: &str,
) -> Vec<SuggestedAction> {
    let mut actions = Vec::new();
    let mut seen = HashSet::new();

    for entity in entities {
        for action in actions_for_entity(entity) {
            if seen.insert(action.id.clone()) {
                actions.push(action);
            }
        }
    }

    if mentions_any(text, CREATION_KEYWORDS) {
        let action = SuggestedAction {
            id: "create-deal-followup".into(),
            label: "Create Another Deal".into(),
            icon: Some("plus".into()),
            variant: None,
            action: ActionKind::Create,
            target: None,
            payload: None,
            entity_id: None,
            disabled: false,
            tooltip: None,
        };
        if seen.insert(action.id.clone()) {
            actions.push(action);
        }
    }

    if !entities.is_empty() && mentions_any(text, SEARCH_KEYWORDS) {
        let action = SuggestedAction {
            id: "refine-search".into(),
            label: "Refine Search".into(),
            icon: Some("magnifier".into()),
            variant: None,
            action: ActionKind::View,
            target: None,
            payload: None,
            entity_id: None,
            disabled: false,
            tooltip: Some("Narrow down the results".into()),
        };
        if seen.insert(action.id.clone()) {
            actions.push(action);
        }
    }

    actions
}
