// ABOUTME: Tool identifier constants to eliminate hardcoded tool names.
// ABOUTME: Provides centralized tool name constants organized by functional groups.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! Tool identifier constants

/// Organization mutation tools
pub const CREATE_ORGANIZATION: &str = "create_organization";
/// Update an existing organization
pub const UPDATE_ORGANIZATION: &str = "update_organization";

/// Person mutation tools
pub const CREATE_PERSON: &str = "create_person";
/// Update an existing person
pub const UPDATE_PERSON: &str = "update_person";

/// Deal mutation tools
pub const CREATE_DEAL: &str = "create_deal";
/// Update an existing deal
pub const UPDATE_DEAL: &str = "update_deal";

/// Structured reasoning capture
pub const THINK: &str = "think";

/// Category names used when registering built-in tools
pub mod categories {
    /// CRM entity mutation tools
    pub const CRM: &str = "crm";
    /// Reasoning/planning tools
    pub const REASONING: &str = "reasoning";
}
