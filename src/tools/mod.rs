// ABOUTME: Tool execution subsystem: trait, context, reports, workflow traces, and registry.
// ABOUTME: Entry point for dispatching named tools invoked by the AI assistant.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tools
//!
//! The pluggable tool architecture of the assistant core:
//!
//! - [`traits::CrmTool`] - the trait every tool implements
//! - [`context::ToolExecutionContext`] - per-call identity and resources
//! - [`report::ToolReport`] - the tagged success/failure result type
//! - [`workflow::WorkflowTrace`] - the per-invocation observability trace
//! - [`registry::ToolRegistry`] - registration, discovery, and dispatch

pub mod context;
pub mod errors;
pub mod implementations;
pub mod registry;
pub mod report;
pub mod traits;
pub mod workflow;

pub use context::ToolExecutionContext;
pub use errors::ToolError;
pub use registry::ToolRegistry;
pub use report::{EntityKind, FailureCode, ToolFailure, ToolReport, ToolSuccess};
pub use traits::{CrmTool, ToolCapabilities};
pub use workflow::{StepStatus, WorkflowStep, WorkflowTrace};
