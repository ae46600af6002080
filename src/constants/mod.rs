// ABOUTME: Centralized constants for the assistant core.
// ABOUTME: Tool identifiers, heuristic limits, and service names live here.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! Centralized constants

pub mod limits;
pub mod tools;

/// Service identity constants
pub mod service_names {
    /// Canonical service name for logging and trace records
    pub const RELAY_CRM_ASSISTANT: &str = "relay-crm-assistant";
}
