// ABOUTME: Tool-boundary error types for the pluggable tools architecture.
// ABOUTME: These are integration failures, not business-rule outcomes.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Error Types
//!
//! Errors at the registry/dispatch boundary. Dispatching an unregistered
//! tool name is a caller/integration bug and therefore propagates as an
//! error rather than a structured report - the one place the tool layer
//! throws.

use std::error::Error;
use std::fmt;

use crate::errors::{AppError, ErrorCode};

/// Errors specific to tool dispatch and registration
#[derive(Debug, Clone)]
pub enum ToolError {
    /// Tool was not found in the registry
    NotFound {
        /// Name of the requested tool
        tool_name: String,
    },
    /// Tool arguments were structurally invalid (not an object)
    InvalidArguments {
        /// Name of the tool
        tool_name: String,
        /// Reason the arguments are invalid
        reason: String,
    },
}

impl ToolError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::NotFound {
            tool_name: tool_name.into(),
        }
    }

    /// Create an "invalid arguments" error
    #[must_use]
    pub fn invalid_arguments(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool_name: tool_name.into(),
            reason: reason.into(),
        }
    }

    /// Get the tool name associated with this error
    #[must_use]
    pub fn tool_name(&self) -> &str {
        match self {
            Self::NotFound { tool_name } | Self::InvalidArguments { tool_name, .. } => tool_name,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { tool_name } => {
                write!(f, "Tool '{tool_name}' not found")
            }
            Self::InvalidArguments { tool_name, reason } => {
                write!(f, "Invalid arguments for tool '{tool_name}': {reason}")
            }
        }
    }
}

impl Error for ToolError {}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::NotFound { tool_name } => Self::not_found(format!("tool '{tool_name}'")),
            ToolError::InvalidArguments { tool_name, reason } => Self::new(
                ErrorCode::InvalidInput,
                format!("Invalid arguments for tool '{tool_name}': {reason}"),
            ),
        }
    }
}
