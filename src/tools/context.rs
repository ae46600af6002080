// ABOUTME: Defines ToolExecutionContext providing tools with caller identity and resources.
// ABOUTME: Constructed fresh per invocation with a newly generated request id.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Tool Execution Context
//!
//! A unified context object for tool execution, containing:
//! - Conversation identity (required) and a per-invocation request id
//! - Caller credentials, passed through to the domain services
//! - Access to the shared [`CrmServices`] resource container
//!
//! The context lives for the duration of one tool call and is never
//! persisted. Auth here is pass-through only: tools check that credentials
//! are *present* and forward them; validation is the services' concern.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::services::CrmServices;

/// Context provided to every tool execution.
///
/// The `services` field is an `Arc` clone of the process-wide container;
/// cloning is an atomic increment, so building a fresh context per call is
/// cheap and keeps calls fully isolated from each other.
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Conversation this call belongs to
    pub conversation_id: String,
    /// Generated fresh per invocation for traceability
    pub request_id: Uuid,
    /// Caller's auth token, forwarded to domain services
    pub auth_token: Option<String>,
    /// Caller's user id, scoping every service call
    pub user_id: Option<Uuid>,
    /// Shared domain-service container
    pub services: Arc<CrmServices>,
}

impl ToolExecutionContext {
    /// Create a context for one invocation; generates a fresh request id
    #[must_use]
    pub fn new(conversation_id: impl Into<String>, services: Arc<CrmServices>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            request_id: Uuid::new_v4(),
            auth_token: None,
            user_id: None,
            services,
        }
    }

    /// Attach caller credentials
    #[must_use]
    pub fn with_auth(mut self, auth_token: impl Into<String>, user_id: Uuid) -> Self {
        self.auth_token = Some(auth_token.into());
        self.user_id = Some(user_id);
        self
    }

    /// Both credentials, when present.
    ///
    /// Mutation tools call this first and fail with an `AUTH_REQUIRED`
    /// report when it returns `None` - no partial work is performed.
    #[must_use]
    pub fn credentials(&self) -> Option<(Uuid, &str)> {
        match (self.user_id, self.auth_token.as_deref()) {
            (Some(user_id), Some(token)) => Some((user_id, token)),
            _ => None,
        }
    }

    /// Tracing span attributes for this context
    #[must_use]
    pub fn span_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            ("conversation_id", self.conversation_id.clone()),
            ("request_id", self.request_id.to_string()),
        ];
        if let Some(user_id) = self.user_id {
            attrs.push(("user_id", user_id.to_string()));
        }
        attrs
    }
}

impl fmt::Debug for ToolExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolExecutionContext")
            .field("conversation_id", &self.conversation_id)
            .field("request_id", &self.request_id)
            .field("user_id", &self.user_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("services", &"<CrmServices>")
            .finish()
    }
}
