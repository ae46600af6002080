// ABOUTME: Defines the CrmTool trait and ToolCapabilities for the pluggable tools architecture.
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Trait and Capabilities
//!
//! The core abstraction for assistant tools. All tools implement the
//! [`CrmTool`] trait, which provides:
//! - Tool metadata (name, description, input schema)
//! - Capability flags for filtering and discovery
//! - Async execution with context
//!
//! Tools are stateless `Send + Sync` values shared via `Arc`; per-call
//! state (the workflow trace) is an explicit local value, so concurrent
//! invocations never share mutable state.

use async_trait::async_trait;
use bitflags::bitflags;
use serde_json::Value;

use crate::errors::AppResult;
use crate::schema::JsonSchema;

use super::context::ToolExecutionContext;
use super::report::ToolReport;

bitflags! {
    /// Capabilities that tools declare for filtering and discovery.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Tool requires caller credentials
        const REQUIRES_AUTH = 0b0000_0001;
        /// Tool reads CRM data
        const READS_DATA = 0b0000_0010;
        /// Tool writes/modifies CRM data
        const WRITES_DATA = 0b0000_0100;
        /// Tool captures planner reasoning
        const REASONING = 0b0000_1000;
        /// Tool operates on organizations
        const ORGANIZATIONS = 0b0001_0000;
        /// Tool operates on people
        const PEOPLE = 0b0010_0000;
        /// Tool operates on deals
        const DEALS = 0b0100_0000;
    }
}

impl ToolCapabilities {
    /// Check if the tool requires caller credentials
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        self.contains(Self::REQUIRES_AUTH)
    }

    /// Check if the tool writes data (useful for cache invalidation)
    #[must_use]
    pub const fn writes_data(self) -> bool {
        self.contains(Self::WRITES_DATA)
    }

    /// Get a description of all enabled capabilities for logging
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if self.contains(Self::REQUIRES_AUTH) {
            parts.push("requires_auth");
        }
        if self.contains(Self::READS_DATA) {
            parts.push("reads_data");
        }
        if self.contains(Self::WRITES_DATA) {
            parts.push("writes_data");
        }
        if self.contains(Self::REASONING) {
            parts.push("reasoning");
        }
        if self.contains(Self::ORGANIZATIONS) {
            parts.push("organizations");
        }
        if self.contains(Self::PEOPLE) {
            parts.push("people");
        }
        if self.contains(Self::DEALS) {
            parts.push("deals");
        }

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// The trait all assistant tools implement.
///
/// # Design Notes
///
/// - Tools are `Send + Sync` for safe sharing across async tasks
/// - `name()` returns `&'static str` for zero-allocation lookup
/// - `execute()` returns a structured [`ToolReport`] for every expected
///   outcome; `Err` is reserved for integration failures (see
///   [`crate::errors`])
#[async_trait]
pub trait CrmTool: Send + Sync {
    /// Unique identifier (e.g., `create_organization`)
    fn name(&self) -> &'static str;

    /// Human-readable description for LLM consumption
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters, advertised to the calling model
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags for filtering and validation
    fn capabilities(&self) -> ToolCapabilities;

    /// Execute the tool with given arguments and context
    ///
    /// # Errors
    ///
    /// Returns `AppError` only for failures that are not expressible as a
    /// structured report: reasoning-trace persistence failures and internal
    /// serialization bugs. Business-rule failures come back as
    /// `ToolReport::Failure`.
    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolReport>;
}
