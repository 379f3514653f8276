// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-workspace change bus — ordered handlers notified with the latest
//! workspace snapshot whenever it changes.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use wsc_core::{Workspace, WorkspaceId};

/// Callback invoked with the new workspace snapshot.
pub type ChangeHandler = Arc<dyn Fn(&Workspace) + Send + Sync>;

/// Token identifying a registered handler, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

#[derive(Default)]
struct BusState {
    next_id: u64,
    handlers: HashMap<WorkspaceId, Vec<(HandlerId, ChangeHandler)>>,
}

/// Typed publish/subscribe channel keyed by workspace id.
#[derive(Default)]
pub struct ChangeBus {
    inner: Mutex<BusState>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one workspace. Handlers fire in registration
    /// order.
    pub fn register(
        &self,
        id: &WorkspaceId,
        handler: impl Fn(&Workspace) + Send + Sync + 'static,
    ) -> HandlerId {
        let mut state = self.inner.lock();
        let handler_id = HandlerId(state.next_id);
        state.next_id += 1;
        state.handlers.entry(id.clone()).or_default().push((handler_id, Arc::new(handler)));
        handler_id
    }

    /// Remove a handler. Returns false when it was not registered.
    pub fn unregister(&self, id: &WorkspaceId, handler_id: HandlerId) -> bool {
        let mut state = self.inner.lock();
        let Some(handlers) = state.handlers.get_mut(id) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != handler_id);
        handlers.len() != before
    }

    /// Deliver a snapshot to every handler registered for the workspace.
    pub fn publish(&self, id: &WorkspaceId, workspace: &Workspace) {
        // Handlers run outside the lock so they may re-enter the bus.
        let handlers: Vec<ChangeHandler> = {
            let state = self.inner.lock();
            match state.handlers.get(id) {
                Some(handlers) => handlers.iter().map(|(_, h)| h.clone()).collect(),
                None => return,
            }
        };
        for handler in handlers {
            handler(workspace);
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
