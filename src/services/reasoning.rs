// ABOUTME: Reasoning-trace persistence sink written to by the think tool.
// ABOUTME: One insert per think call, keyed by conversation id.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Reasoning Trace Store
//!
//! The think tool externalizes an AI planner's structured reasoning and
//! persists it for audit and replay. This module defines the record shape
//! and the store trait. A persistence failure here is fatal for the think
//! call - the trace *is* the tool's primary output.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Heuristic scores attached to one captured reasoning trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionData {
    /// `shallow`, `moderate`, or `deep`
    pub thinking_depth: String,
    /// Strategic value score, 1–10
    pub strategic_value: u8,
    /// Confidence level, 0.1–1.0
    pub confidence_level: f64,
}

/// One persisted reasoning trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningTraceRecord {
    /// Conversation this trace belongs to
    pub conversation_id: String,
    /// Record discriminator, always `"reasoning"`
    #[serde(rename = "type")]
    pub record_type: String,
    /// Full rendered content of the trace
    pub content: String,
    /// Structured metadata (tool id, timestamp, scores)
    pub metadata: Value,
    /// The planner's reasoning text
    pub reasoning: String,
    /// The planner's strategy text
    pub strategy: String,
    /// Concerns raised, if any
    pub concerns: Option<String>,
    /// Planned next steps
    pub next_steps: String,
    /// Reserved; always `null` in this pipeline
    pub thinking_budget: Option<u32>,
    /// Heuristic scores
    pub reflection_data: ReflectionData,
}

/// Persistence sink for reasoning traces
#[async_trait]
pub trait ReasoningTraceStore: Send + Sync {
    /// Insert one trace record. No retry is performed here; callers
    /// experiencing a transient failure retry the whole tool call.
    async fn insert_trace(&self, record: &ReasoningTraceRecord) -> Result<()>;

    /// List traces recorded for a conversation, oldest first
    async fn list_traces(&self, conversation_id: &str) -> Result<Vec<ReasoningTraceRecord>>;
}
