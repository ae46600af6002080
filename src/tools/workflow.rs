// ABOUTME: Append-only workflow trace recorded by every tool invocation for observability.
// ABOUTME: The trace is an explicit value threaded through execution, never instance state.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Workflow Traces
//!
//! Every tool call accumulates an ordered list of [`WorkflowStep`]s -
//! `initialize → validation → [duplicate_check|conflict_check] →
//! change_analysis → <entity>_creation/<entity>_update` - terminating in an
//! `error` step on failure. Steps are timestamped at the moment they are
//! appended, never backdated, and the trace is owned by a single invocation.
//! It exists purely for observability; nothing resumes work from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of one workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step has started
    InProgress,
    /// Step finished successfully
    Completed,
    /// Step failed; the trace ends here
    Failed,
}

/// One entry in a tool invocation's trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step name (`initialize`, `validation`, ...)
    pub step: String,
    /// Step outcome
    pub status: StepStatus,
    /// Appended-at timestamp
    pub timestamp: DateTime<Utc>,
    /// Human-readable detail line
    pub details: String,
    /// Optional structured payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Ordered, append-only trace builder threaded through a tool's execution.
#[derive(Debug, Default)]
pub struct WorkflowTrace {
    steps: Vec<WorkflowStep>,
}

impl WorkflowTrace {
    /// Start an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step with the given status
    pub fn record(&mut self, step: &str, status: StepStatus, details: impl Into<String>) {
        self.steps.push(WorkflowStep {
            step: step.to_owned(),
            status,
            timestamp: Utc::now(),
            details: details.into(),
            data: None,
        });
    }

    /// Append a completed step
    pub fn completed(&mut self, step: &str, details: impl Into<String>) {
        self.record(step, StepStatus::Completed, details);
    }

    /// Append a completed step carrying structured data
    pub fn completed_with_data(&mut self, step: &str, details: impl Into<String>, data: Value) {
        self.steps.push(WorkflowStep {
            step: step.to_owned(),
            status: StepStatus::Completed,
            timestamp: Utc::now(),
            details: details.into(),
            data: Some(data),
        });
    }

    /// Append a failed step
    pub fn failed(&mut self, step: &str, details: impl Into<String>) {
        self.record(step, StepStatus::Failed, details);
    }

    /// Number of steps recorded so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consume the trace, yielding the ordered steps
    #[must_use]
    pub fn into_steps(self) -> Vec<WorkflowStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_preserves_append_order() {
        let mut trace = WorkflowTrace::new();
        trace.completed("initialize", "starting");
        trace.completed("validation", "input ok");
        trace.failed("duplicate_check", "exact match found");

        let steps = trace.into_steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].step, "initialize");
        assert_eq!(steps[2].status, StepStatus::Failed);
        assert!(steps[0].timestamp <= steps[2].timestamp);
    }

    #[test]
    fn step_serializes_snake_case_status() {
        let mut trace = WorkflowTrace::new();
        trace.record("validation", StepStatus::InProgress, "checking");
        let json = serde_json::to_value(trace.into_steps()).unwrap();
        assert_eq!(json[0]["status"], "in_progress");
    }
}
