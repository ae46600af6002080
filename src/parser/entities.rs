// ABOUTME: Business-entity detection over the most recent tool-call payload.
// ABOUTME: Shape-based recognition of organization and deal records with id-keyed dedup.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Entity Detection
//!
//! Scans the most recent tool-call thought's raw payload for business
//! entities, by shape:
//!
//! - **organization-shaped**: an object with a `name` and no `amount`
//! - **deal-shaped**: an object with an `amount`
//!
//! Arrays and single records are both accepted. Deals resolve their
//! `organization_id` against the organizations seen in the same payload to
//! recover a display name, and blank deal names are synthesized
//! (`"<Org> Opportunity"` / `"$<amount> Deal"`). Entities are deduplicated
//! by id; the last record written for an id wins within the pass.
//!
//! Only the most recent thought is scanned - entities from earlier,
//! superseded tool calls in the same turn would be stale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::format_amount;

use super::ToolThought;

/// Kind of detected business entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedEntityType {
    /// A sales opportunity
    Deal,
    /// A contact
    Contact,
    /// A company/account
    Organization,
    /// A calendar/task activity
    Activity,
}

impl DetectedEntityType {
    /// Stable lowercase identifier, used in suggested-action ids
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deal => "deal",
            Self::Contact => "contact",
            Self::Organization => "organization",
            Self::Activity => "activity",
        }
    }
}

/// A business entity inferred from conversational data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedEntity {
    /// Entity kind
    #[serde(rename = "type")]
    pub entity_type: DetectedEntityType,
    /// Identity; unique within one parse pass
    pub id: String,
    /// Display name, possibly synthesized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Monetary value for deals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Resolved owning-organization name for deals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Extra fields carried through for consumers
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub metadata: Map<String, Value>,
}

/// Insertion-ordered, id-keyed entity collection; last writer wins
#[derive(Default)]
struct EntityIndex {
    order: Vec<String>,
    by_id: HashMap<String, DetectedEntity>,
}

impl EntityIndex {
    fn insert(&mut self, entity: DetectedEntity) {
        if !self.by_id.contains_key(&entity.id) {
            self.order.push(entity.id.clone());
        }
        self.by_id.insert(entity.id.clone(), entity);
    }

    fn into_entities(mut self) -> Vec<DetectedEntity> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

/// Extract a record's id as a string, accepting strings and numbers
fn record_id(record: &Value) -> Option<String> {
    match record.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a non-blank string field
fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Extract an amount, accepting numbers and numeric strings
fn amount_field(record: &Value) -> Option<f64> {
    match record.get("amount") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace([',', '$'], "").parse().ok(),
        _ => None,
    }
}

/// An object with a name and no amount reads as an organization record
fn is_organization_shaped(record: &Value) -> bool {
    record.is_object()
        && string_field(record, "name").is_some()
        && record.get("amount").is_none()
        && record_id(record).is_some()
}

/// An object with an amount reads as a deal record
fn is_deal_shaped(record: &Value) -> bool {
    record.is_object() && amount_field(record).is_some() && record_id(record).is_some()
}

/// View a payload as a list of candidate records (array or single object)
fn candidate_records(payload: &Value) -> Vec<&Value> {
    match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![payload],
        _ => Vec::new(),
    }
}

/// Normalize a thought payload: JSON strings are parsed, everything else
/// passes through.
fn normalize_payload(payload: &Value) -> Option<Value> {
    match payload {
        Value::String(raw) => serde_json::from_str(raw).ok(),
        other => Some(other.clone()),
    }
}

/// Detect entities in the most recent tool thought.
#[must_use]
pub fn detect_entities(thoughts: &[ToolThought]) -> Vec<DetectedEntity> {
    let Some(payload) = thoughts.last().and_then(|t| normalize_payload(&t.payload)) else {
        return Vec::new();
    };

    let records = candidate_records(&payload);
    let mut index = EntityIndex::default();
    let mut organization_names: HashMap<String, String> = HashMap::new();

    // Pass 1: organizations, indexed by id for deal cross-referencing.
    for record in &records {
        if !is_organization_shaped(record) {
            continue;
        }
        let Some(id) = record_id(record) else { continue };
        let name = string_field(record, "name");

        if let Some(name) = &name {
            organization_names.insert(id.clone(), name.clone());
        }

        index.insert(DetectedEntity {
            entity_type: DetectedEntityType::Organization,
            id,
            name,
            amount: None,
            organization_name: None,
            metadata: Map::new(),
        });
    }

    // Pass 2: deals, resolving organization names from pass 1 and
    // synthesizing blank names.
    for record in &records {
        if !is_deal_shaped(record) {
            continue;
        }
        let Some(id) = record_id(record) else { continue };
        let amount = amount_field(record);

        let organization_name = string_field(record, "organization_id")
            .and_then(|org_id| organization_names.get(&org_id).cloned());

        let name = string_field(record, "name").or_else(|| {
            organization_name.as_ref().map_or_else(
                || amount.map(|a| format!("${} Deal", format_amount(a))),
                |org| Some(format!("{org} Opportunity")),
            )
        });

        index.insert(DetectedEntity {
            entity_type: DetectedEntityType::Deal,
            id,
            name,
            amount,
            organization_name,
            metadata: Map::new(),
        });
    }

    index.into_entities()
}
