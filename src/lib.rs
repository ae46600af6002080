// ABOUTME: Library root for the Relay CRM assistant core.
// ABOUTME: Exposes the tool registry, tool implementations, and the response enhancement pipeline.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Relay CRM Assistant Core
//!
//! The agentic backbone of the Relay CRM AI assistant:
//!
//! - [`tools`] - a registry dispatching named, schema-described tools that an
//!   AI model can invoke, plus the CRM mutation tools and the think tool.
//! - [`parser`] - the response enhancement pipeline that detects business
//!   entities in tool output and synthesizes suggested follow-up actions.
//! - [`services`] - the domain-service seam the tools mutate through, with an
//!   in-memory implementation for tests and local runs.
//!
//! The registry is constructed and owned by the application's composition
//! root and passed by reference to whatever dispatches tools; there is no
//! process-wide singleton.

#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod parser;
pub mod schema;
pub mod services;
pub mod tools;
pub mod utils;

pub use errors::{AppError, AppResult, ErrorCode};
pub use tools::registry::ToolRegistry;
pub use tools::{ToolExecutionContext, ToolReport};
