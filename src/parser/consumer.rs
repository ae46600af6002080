// ABOUTME: Action-dispatch contract between the enhancement pipeline and the UI.
// ABOUTME: A caller-supplied handler overrides the logging default.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! # Action Consumer
//!
//! The UI renders [`SuggestedAction`]s and dispatches the chosen one. When
//! the caller supplies a handler it receives every dispatched action; when
//! none is supplied, [`DefaultActionHandler`] handles the two actions with
//! core-side meaning (`navigate`, `copy`) and no-ops with a log line
//! otherwise. Actual navigation and clipboard access are UI concerns - the
//! default handler only surfaces the intent.

use tracing::{debug, info};

use super::actions::{ActionKind, SuggestedAction};

/// Receives dispatched suggested actions
pub trait ActionHandler: Send + Sync {
    /// Handle one dispatched action
    fn handle(&self, action: &SuggestedAction);
}

impl<F> ActionHandler for F
where
    F: Fn(&SuggestedAction) + Send + Sync,
{
    fn handle(&self, action: &SuggestedAction) {
        self(action);
    }
}

/// Default handler used when the caller supplies none
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionHandler;

impl ActionHandler for DefaultActionHandler {
    fn handle(&self, action: &SuggestedAction) {
        match action.action {
            ActionKind::Navigate => {
                info!(
                    action_id = %action.id,
                    target = action.target.as_deref().unwrap_or(""),
                    "Navigation requested"
                );
            }
            ActionKind::Copy => {
                let value = action
                    .payload
                    .as_ref()
                    .and_then(|p| p.get("value"))
                    .map(ToString::to_string)
                    .unwrap_or_default();
                info!(action_id = %action.id, value = %value, "Copy requested");
            }
            _ => {
                debug!(action_id = %action.id, "No default handling for action");
            }
        }
    }
}

/// Dispatch an action to the caller's handler, falling back to the default.
pub fn dispatch_action(action: &SuggestedAction, handler: Option<&dyn ActionHandler>) {
    match handler {
        Some(handler) => handler.handle(action),
        None => DefaultActionHandler.handle(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn navigate_action() -> SuggestedAction {
        SuggestedAction {
            id: "view-deal-d1".into(),
            label: "View Deal".into(),
            icon: None,
            variant: None,
            action: ActionKind::Navigate,
            target: Some("/deals/d1".into()),
            payload: None,
            entity_id: Some("d1".into()),
            disabled: false,
            tooltip: None,
        }
    }

    #[test]
    fn caller_handler_takes_precedence() {
        let calls = AtomicUsize::new(0);
        let handler = |_action: &SuggestedAction| {
            calls.fetch_add(1, Ordering::Relaxed);
        };

        dispatch_action(&navigate_action(), Some(&handler));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn default_handler_does_not_panic() {
        dispatch_action(&navigate_action(), None);
    }
}
