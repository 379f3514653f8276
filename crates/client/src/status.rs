// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status registry — last-known lifecycle status per workspace plus the
//! wait-ticket table for status-change futures.
//!
//! Tickets are keyed by `(workspace id, raw event-type string)`. A ticket is
//! one-shot: when an event with that exact type arrives, every ticket queued
//! under the key resolves with the event payload and the queue is cleared.
//! Tickets never time out — callers own any deadline.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use wsc_core::{StatusEvent, WorkspaceId, WorkspaceStatus};

#[derive(Default)]
struct RegistryState {
    statuses: HashMap<WorkspaceId, WorkspaceStatus>,
    tickets: HashMap<WorkspaceId, HashMap<String, Vec<oneshot::Sender<StatusEvent>>>>,
}

/// Tracks the last-known status of each workspace and hands out futures that
/// resolve when a workspace reaches a target status.
#[derive(Default)]
pub struct StatusRegistry {
    inner: Mutex<RegistryState>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-known status for a workspace, if any event or fetch recorded one.
    pub fn status(&self, id: &WorkspaceId) -> Option<WorkspaceStatus> {
        self.inner.lock().statuses.get(id).copied()
    }

    /// Record a status observed outside the event channel (directory fetches).
    pub fn set_status(&self, id: &WorkspaceId, status: WorkspaceStatus) {
        self.inner.lock().statuses.insert(id.clone(), status);
    }

    /// Drop all state for a removed workspace. Pending tickets resolve with
    /// no payload.
    pub fn forget(&self, id: &WorkspaceId) {
        let mut state = self.inner.lock();
        state.statuses.remove(id);
        state.tickets.remove(id);
    }

    /// Future resolving once the workspace reaches `target`. Resolves
    /// immediately (with no event payload) when the last-known status already
    /// matches.
    pub fn await_status(&self, id: &WorkspaceId, target: WorkspaceStatus) -> StatusWait {
        self.await_event(id, target.as_str())
    }

    /// Future resolving on the next event whose raw type equals `event_type`.
    ///
    /// The ticket is enqueued before this returns, so an event arriving right
    /// after the call is never missed.
    pub fn await_event(&self, id: &WorkspaceId, event_type: &str) -> StatusWait {
        let mut state = self.inner.lock();
        if state.statuses.get(id).map(|s| s.as_str()) == Some(event_type) {
            return StatusWait { rx: None };
        }
        let (tx, rx) = oneshot::channel();
        state
            .tickets
            .entry(id.clone())
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push(tx);
        StatusWait { rx: Some(rx) }
    }

    /// Apply one status event: update the last-known status when the event
    /// names one, then resolve and clear every ticket queued under the raw
    /// event type. Returns the status the event mapped to, if any.
    pub fn apply_event(&self, event: &StatusEvent) -> Option<WorkspaceStatus> {
        let mapped = event.status();
        let waiters = {
            let mut state = self.inner.lock();
            if let Some(status) = mapped {
                state.statuses.insert(event.workspace_id.clone(), status);
            }
            state
                .tickets
                .get_mut(&event.workspace_id)
                .and_then(|by_type| by_type.remove(&event.event_type))
                .unwrap_or_default()
        };
        for tx in waiters {
            let _ = tx.send(event.clone());
        }
        mapped
    }
}

/// Future returned by [`StatusRegistry::await_status`] /
/// [`StatusRegistry::await_event`].
///
/// Resolves to `Some(event)` when fired by an event, or `None` when the
/// status already matched at call time (or the registry went away).
pub struct StatusWait {
    rx: Option<oneshot::Receiver<StatusEvent>>,
}

impl Future for StatusWait {
    type Output = Option<StatusEvent>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.as_mut() {
            None => Poll::Ready(None),
            Some(rx) => Pin::new(rx).poll(cx).map(Result::ok),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
