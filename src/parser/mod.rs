// ABOUTME: Response enhancement pipeline: entity detection, actionable data, suggested actions.
// ABOUTME: Pure, stateless computation over one conversational turn's transcript.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Response Enhancement Pipeline
//!
//! Given the transcript of a conversational turn - the free-text response
//! plus the tool-call thoughts that produced it - infer which business
//! entities were involved and what the user might plausibly want to do
//! next:
//!
//! - [`entities`] - entity detection over the most recent tool thought
//! - [`actions`] - copyable data fragments and suggested follow-up actions
//! - [`consumer`] - the action-dispatch contract for the UI
//!
//! The pipeline is pure CPU-only computation with no I/O and no shared
//! state: the same inputs always produce the same output, and it is safe to
//! call repeatedly and concurrently.

pub mod actions;
pub mod consumer;
pub mod entities;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use actions::{ActionKind, ActionableData, SuggestedAction};
pub use consumer::{dispatch_action, ActionHandler, DefaultActionHandler};
pub use entities::{DetectedEntity, DetectedEntityType};

/// One tool-call thought from a conversational turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolThought {
    /// Name of the tool that produced this payload, when known
    pub tool_name: Option<String>,
    /// Raw payload: parsed JSON, or a string containing JSON
    pub payload: Value,
}

impl ToolThought {
    /// Build a thought from an already-parsed payload
    #[must_use]
    pub fn new(tool_name: Option<String>, payload: Value) -> Self {
        Self { tool_name, payload }
    }
}

/// Aggregate result of one parse pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnhancements {
    /// Detected business entities, deduplicated by id
    pub entities: Vec<DetectedEntity>,
    /// Copyable data fragments extracted from the free text
    pub actionable_data: Vec<ActionableData>,
    /// Proposed follow-up actions, deduplicated by action id
    pub suggested_actions: Vec<SuggestedAction>,
    /// Whether any of the three lists is non-empty
    pub has_enhancements: bool,
}

/// Run the full enhancement pipeline over one turn.
///
/// Entity detection consumes only the most recent tool thought (earlier
/// thoughts describe superseded operations); actionable data comes from the
/// free text; suggested actions derive from both.
#[must_use]
pub fn enhance_response(text: &str, thoughts: &[ToolThought]) -> ResponseEnhancements {
    let entities = entities::detect_entities(thoughts);
    let actionable_data = actions::extract_actionable_data(text);
    let suggested_actions = actions::generate_suggested_actions(&entities, text);

    let has_enhancements =
        !entities.is_empty() || !actionable_data.is_empty() || !suggested_actions.is_empty();

    ResponseEnhancements {
        entities,
        actionable_data,
        suggested_actions,
        has_enhancements,
    }
}
