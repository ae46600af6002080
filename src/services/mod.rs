// ABOUTME: Domain-service seam for the assistant core plus the shared resource container.
// ABOUTME: Tools mutate CRM entities only through these traits, never through storage directly.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Domain Services
//!
//! The narrow interface between the assistant core and the rest of the CRM.
//! Tools call [`OrganizationService`], [`PersonService`], and [`DealService`]
//! for all entity reads and writes; the think tool writes through
//! [`ReasoningTraceStore`]. Implementations live outside this crate in
//! production; [`memory::InMemoryCrm`] backs tests and local runs.

pub mod memory;
pub mod reasoning;
pub mod traits;

use std::sync::Arc;

pub use reasoning::{ReasoningTraceRecord, ReasoningTraceStore};
pub use traits::{DealService, OrganizationService, PersonService};

use memory::InMemoryCrm;

/// Shared resource container handed to every tool execution.
///
/// Cloning the `Arc`s is cheap; the container itself is built once by the
/// composition root and shared across concurrent tool calls.
#[derive(Clone)]
pub struct CrmServices {
    /// Organization reads and writes
    pub organizations: Arc<dyn OrganizationService>,
    /// Person reads and writes
    pub people: Arc<dyn PersonService>,
    /// Deal reads and writes
    pub deals: Arc<dyn DealService>,
    /// Reasoning-trace persistence sink
    pub reasoning: Arc<dyn ReasoningTraceStore>,
}

impl CrmServices {
    /// Bundle service implementations into a container
    #[must_use]
    pub fn new(
        organizations: Arc<dyn OrganizationService>,
        people: Arc<dyn PersonService>,
        deals: Arc<dyn DealService>,
        reasoning: Arc<dyn ReasoningTraceStore>,
    ) -> Self {
        Self {
            organizations,
            people,
            deals,
            reasoning,
        }
    }

    /// Build a container backed by a single in-memory store.
    ///
    /// Used by the CLI and tests; production wires real service clients.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryCrm::new());
        Self {
            organizations: store.clone(),
            people: store.clone(),
            deals: store.clone(),
            reasoning: store,
        }
    }
}

impl std::fmt::Debug for CrmServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmServices").finish_non_exhaustive()
    }
}
