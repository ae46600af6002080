// ABOUTME: Configuration module for deployment-specific settings.
// ABOUTME: Re-exports the environment-based configuration types.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! Configuration management

pub mod environment;

pub use environment::{AgentConfig, Environment, LogLevel};
