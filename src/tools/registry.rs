// ABOUTME: Central registry for assistant tools with category bookkeeping and dispatch.
// ABOUTME: Owned by the composition root; read-only after startup registration.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Registry
//!
//! Central registry for assistant tools, providing:
//! - Tool registration and lookup
//! - Category bookkeeping (CRM vs reasoning tools)
//! - Schema generation for advertising tools to the calling model
//! - Dispatch with per-call contexts
//!
//! The registry is an explicit object constructed and owned by the
//! application's composition root and passed by reference to whatever
//! dispatches tools - never a module-level singleton. It is built once at
//! startup and then used immutably, so concurrent lookups need no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::schema::ToolSchema;

use super::context::ToolExecutionContext;
use super::errors::ToolError;
use super::report::ToolReport;
use super::traits::{CrmTool, ToolCapabilities};

/// Central registry for assistant tools
pub struct ToolRegistry {
    /// Registered tools by name
    tools: HashMap<String, Arc<dyn CrmTool>>,
    /// Tool categories for organization
    categories: HashMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Register a tool in the registry.
    ///
    /// Re-registering a name replaces the previous entry (last registration
    /// wins) and logs a warning - duplicate names are a wiring mistake worth
    /// surfacing but not worth failing startup over.
    pub fn register(&mut self, tool: Arc<dyn CrmTool>) {
        let name = tool.name().to_owned();

        debug!(
            "Registering tool '{}' with capabilities: {}",
            name,
            tool.capabilities().describe()
        );

        if self.tools.insert(name.clone(), tool).is_some() {
            warn!("Tool '{}' was already registered; replaced", name);
        }
    }

    /// Register a tool and categorize it
    pub fn register_with_category(&mut self, tool: Arc<dyn CrmTool>, category: &str) {
        let name = tool.name().to_owned();
        self.register(tool);
        let names = self.categories.entry(category.to_owned()).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CrmTool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool names
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// List tool names in a specific category
    #[must_use]
    pub fn tools_in_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// List all categories
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// List all tool schemas, advertised to the calling model
    #[must_use]
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|tool| ToolSchema {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Filter tools by capabilities
    #[must_use]
    pub fn filter_by_capabilities(&self, required: ToolCapabilities) -> Vec<&Arc<dyn CrmTool>> {
        self.tools
            .values()
            .filter(|tool| tool.capabilities().contains(required))
            .collect()
    }

    /// Get tools that write data (for cache invalidation)
    #[must_use]
    pub fn write_tools(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|(_, tool)| tool.capabilities().writes_data())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// Looks up the tool and awaits its execution with the provided
    /// per-call context. The tool itself never shares state across calls;
    /// call isolation comes from the fresh context (with its fresh
    /// `request_id`) built by the caller per invocation.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the tool is not registered (a caller bug, not
    /// a business-rule outcome) or if the tool's own execution hits an
    /// integration failure.
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: &ToolExecutionContext,
    ) -> AppResult<ToolReport> {
        let tool = self.get(name).ok_or_else(|| ToolError::not_found(name))?;

        debug!(
            tool = name,
            conversation_id = %ctx.conversation_id,
            request_id = %ctx.request_id,
            "Executing tool"
        );

        tool.execute(args, ctx).await
    }

    /// Register all built-in tools.
    ///
    /// Called once at startup by the composition root.
    pub fn register_builtin_tools(&mut self) {
        use super::implementations::{create_crm_tools, create_reasoning_tools};
        use crate::constants::tools::categories;

        info!("Registering built-in tools...");

        for tool in create_crm_tools() {
            self.register_with_category(Arc::from(tool), categories::CRM);
        }

        for tool in create_reasoning_tools() {
            self.register_with_category(Arc::from(tool), categories::REASONING);
        }

        info!("Registered {} built-in tools", self.len());
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.tool_names())
            .field("categories", &self.categories())
            .finish()
    }
}
