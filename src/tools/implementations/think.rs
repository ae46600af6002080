// ABOUTME: Think tool capturing structured planner reasoning with heuristic metadata.
// ABOUTME: Persists one reasoning trace per call; a persistence failure is fatal for the call.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Think Tool
//!
//! Lets an AI planner externalize structured reasoning before acting -
//! acknowledgment, reasoning, strategy, concerns, next steps - and persists
//! it for audit and replay. Missing required fields are defaulted to
//! placeholders rather than rejected: the tool never hard-fails on
//! malformed model input. The attached metadata (thinking depth, strategic
//! value, confidence level) comes from deterministic, pure heuristics over
//! the input text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::limits::{
    CONCERNS_PENALTY_MIN_CHARS, CONFIDENCE_BASE, CONFIDENCE_RANGE, CONNECTIVE_PHRASES,
    DEEP_MIN_CONNECTIVES, DEEP_REASONING_MIN_CHARS, MODERATE_REASONING_MIN_CHARS,
    REASONING_BONUS_MIN_CHARS, STRATEGIC_KEYWORDS, STRATEGIC_VALUE_BASE, STRATEGIC_VALUE_RANGE,
};
use crate::constants::tools as tool_names;
use crate::errors::{AppError, AppResult};
use crate::schema::JsonSchema;
use crate::services::reasoning::{ReasoningTraceRecord, ReflectionData};
use crate::tools::context::ToolExecutionContext;
use crate::tools::report::ToolReport;
use crate::tools::traits::{CrmTool, ToolCapabilities};
use crate::tools::workflow::WorkflowTrace;

use super::string_arg;

/// Depth classification of a reasoning trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingDepth {
    /// Short, unconnected reasoning
    Shallow,
    /// Some length and at least one logical connective
    Moderate,
    /// Long reasoning with several logical connectives
    Deep,
}

impl ThinkingDepth {
    /// Stable snake_case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shallow => "shallow",
            Self::Moderate => "moderate",
            Self::Deep => "deep",
        }
    }
}

/// The captured reasoning trace returned by one think call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkResult {
    /// Generated trace id (`think_<timestamp>_<random>`)
    pub id: String,
    /// Record discriminator, always `"thinking"`
    #[serde(rename = "type")]
    pub result_type: String,
    /// Optional acknowledgment of the user's request
    pub acknowledgment: Option<String>,
    /// The planner's reasoning text
    pub reasoning: String,
    /// The planner's strategy text
    pub strategy: String,
    /// Concerns raised, if any
    pub concerns: Option<String>,
    /// Planned next steps
    pub next_steps: String,
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    /// Heuristic metadata
    pub metadata: ThinkMetadata,
}

/// Heuristic metadata attached to a think result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkMetadata {
    /// Depth classification
    pub thinking_depth: ThinkingDepth,
    /// Strategic value score, 1–10
    pub strategic_value: u8,
    /// Confidence level, 0.1–1.0
    pub confidence_level: f64,
}

/// Count occurrences of keywords in lowercased text
fn keyword_count(text: &str, keywords: &[&str]) -> usize {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| haystack.contains(**keyword))
        .count()
}

/// Classify thinking depth from reasoning length and connective density
fn classify_depth(reasoning: &str) -> ThinkingDepth {
    let connectives = keyword_count(reasoning, CONNECTIVE_PHRASES);

    if reasoning.len() > DEEP_REASONING_MIN_CHARS && connectives >= DEEP_MIN_CONNECTIVES {
        ThinkingDepth::Deep
    } else if reasoning.len() > MODERATE_REASONING_MIN_CHARS && connectives >= 1 {
        ThinkingDepth::Moderate
    } else {
        ThinkingDepth::Shallow
    }
}

/// Score strategic value from keyword density in the strategy text
fn score_strategic_value(strategy: &str) -> u8 {
    let (min, max) = STRATEGIC_VALUE_RANGE;
    let score = STRATEGIC_VALUE_BASE
        .saturating_add(u8::try_from(keyword_count(strategy, STRATEGIC_KEYWORDS)).unwrap_or(u8::MAX));
    score.clamp(min, max)
}

/// Score confidence from concerns, reasoning length, and enumerated steps
fn score_confidence(reasoning: &str, concerns: Option<&str>, next_steps: &str) -> f64 {
    let mut confidence = CONFIDENCE_BASE;

    if concerns.is_some_and(|c| c.len() > CONCERNS_PENALTY_MIN_CHARS) {
        confidence -= 0.2;
    }
    if reasoning.len() > REASONING_BONUS_MIN_CHARS {
        confidence += 0.1;
    }
    if next_steps.contains("1.") || next_steps.contains("2.") {
        confidence += 0.1;
    }

    let (min, max) = CONFIDENCE_RANGE;
    confidence.clamp(min, max)
}

/// Generate a trace id: `think_<millis>_<random>`
fn generate_think_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("think_{}_{:06x}", Utc::now().timestamp_millis(), suffix)
}

/// Tool capturing structured reasoning for audit and replay
pub struct ThinkTool;

#[async_trait]
impl CrmTool for ThinkTool {
    fn name(&self) -> &'static str {
        tool_names::THINK
    }

    fn description(&self) -> &'static str {
        "Record structured reasoning before acting: what was understood, the chosen strategy, concerns, and planned next steps. Always succeeds; the trace is persisted for audit."
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            &[
                ("acknowledgment", "string", "Brief acknowledgment of the user's request"),
                ("reasoning", "string", "The reasoning behind the chosen approach"),
                ("strategy", "string", "The strategy for carrying it out"),
                ("concerns", "string", "Risks or open questions, if any"),
                ("next_steps", "string", "Planned next steps, ideally enumerated"),
            ],
            &["reasoning", "strategy", "next_steps"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::REASONING
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport> {
        let mut trace = WorkflowTrace::new();
        trace.completed(
            "initialize",
            format!("Capturing reasoning (request {})", ctx.request_id),
        );

        // Malformed model input is tolerated: required fields default to
        // placeholders instead of failing the call.
        let acknowledgment = string_arg(&args, "acknowledgment");
        let reasoning =
            string_arg(&args, "reasoning").unwrap_or_else(|| "(no reasoning provided)".into());
        let strategy =
            string_arg(&args, "strategy").unwrap_or_else(|| "(no strategy provided)".into());
        let concerns = string_arg(&args, "concerns");
        let next_steps =
            string_arg(&args, "next_steps").unwrap_or_else(|| "(no next steps provided)".into());

        let metadata = ThinkMetadata {
            thinking_depth: classify_depth(&reasoning),
            strategic_value: score_strategic_value(&strategy),
            confidence_level: score_confidence(&reasoning, concerns.as_deref(), &next_steps),
        };

        let result = ThinkResult {
            id: generate_think_id(),
            result_type: "thinking".into(),
            acknowledgment,
            reasoning,
            strategy,
            concerns,
            next_steps,
            timestamp: Utc::now(),
            metadata,
        };

        trace.completed_with_data(
            "analysis",
            format!(
                "Classified {} reasoning (strategic value {})",
                result.metadata.thinking_depth.as_str(),
                result.metadata.strategic_value
            ),
            json!({ "thinking_id": result.id }),
        );

        debug!(
            conversation_id = %ctx.conversation_id,
            thinking_id = %result.id,
            depth = result.metadata.thinking_depth.as_str(),
            "Persisting reasoning trace"
        );

        let record = ReasoningTraceRecord {
            conversation_id: ctx.conversation_id.clone(),
            record_type: "reasoning".into(),
            content: format!(
                "Reasoning: {}\nStrategy: {}\nNext steps: {}",
                result.reasoning, result.strategy, result.next_steps
            ),
            metadata: json!({
                "thinking_id": result.id,
                "timestamp": result.timestamp,
            }),
            reasoning: result.reasoning.clone(),
            strategy: result.strategy.clone(),
            concerns: result.concerns.clone(),
            next_steps: result.next_steps.clone(),
            thinking_budget: None,
            reflection_data: ReflectionData {
                thinking_depth: result.metadata.thinking_depth.as_str().into(),
                strategic_value: result.metadata.strategic_value,
                confidence_level: result.metadata.confidence_level,
            },
        };

        // The trace is this tool's primary output: if it cannot be
        // persisted, the call fails rather than silently dropping it.
        ctx.services
            .reasoning
            .insert_trace(&record)
            .await
            .map_err(|err| {
                AppError::storage(format!("Failed to persist reasoning trace: {err}"))
            })?;

        trace.completed("persistence", "Reasoning trace stored");

        Ok(ToolReport::success("🧠 Reasoning captured.")
            .with_detail("thinking", serde_json::to_value(&result)?)
            .finish(trace.into_steps()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_classification_needs_length_and_connectives() {
        let reasoning = format!(
            "however therefore furthermore {}",
            "x".repeat(DEEP_REASONING_MIN_CHARS + 1)
        );
        assert_eq!(classify_depth(&reasoning), ThinkingDepth::Deep);
    }

    #[test]
    fn moderate_classification_needs_one_connective() {
        let reasoning = format!("because {}", "x".repeat(MODERATE_REASONING_MIN_CHARS + 1));
        assert_eq!(classify_depth(&reasoning), ThinkingDepth::Moderate);
    }

    #[test]
    fn empty_reasoning_is_shallow() {
        assert_eq!(classify_depth(""), ThinkingDepth::Shallow);
    }

    #[test]
    fn long_reasoning_without_connectives_stays_shallow() {
        let reasoning = "x".repeat(DEEP_REASONING_MIN_CHARS * 2);
        assert_eq!(classify_depth(&reasoning), ThinkingDepth::Shallow);
    }

    #[test]
    fn strategic_value_is_clamped() {
        assert_eq!(score_strategic_value("nothing strategic here"), 3);
        let loaded = "prioritize optimize leverage streamline consolidate align focus scale";
        assert_eq!(score_strategic_value(loaded), 10);
    }

    #[test]
    fn confidence_adjustments_apply() {
        // Base case: no adjustments.
        let base = score_confidence("short", None, "do things");
        assert!((base - 0.8).abs() < f64::EPSILON);

        // Long concerns penalize, enumerated steps reward.
        let adjusted = score_confidence(
            "short",
            Some(&"c".repeat(CONCERNS_PENALTY_MIN_CHARS + 1)),
            "1. first 2. second",
        );
        assert!((adjusted - 0.7).abs() < 1e-9);
    }

    #[test]
    fn think_ids_carry_prefix() {
        let id = generate_think_id();
        assert!(id.starts_with("think_"));
        assert_eq!(id.split('_').count(), 3);
    }
}
