// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace service — the facade over the directory, status registry,
//! change bus, and per-workspace event subscriptions.
//!
//! One mpsc consumer task applies incoming status events, so all state
//! mutation happens on a single logical event-processing thread. The service
//! is explicitly constructed and cheaply cloneable; dropping the last handle
//! ends the event loop and every subscription.

use crate::bus::{ChangeBus, HandlerId};
use crate::directory::WorkspaceDirectory;
use crate::error::ClientError;
use crate::status::{StatusRegistry, StatusWait};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, oneshot};
use wsc_api::{EventFeed, Subscription, WorkspaceApi};
use wsc_core::{
    CommandDef, Project, StatusEvent, Workspace, WorkspaceConfig, WorkspaceId, WorkspaceSettings,
    WorkspaceStatus,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The two statuses a workspace settles in between transitions.
const SETTLED_STATUSES: [WorkspaceStatus; 2] =
    [WorkspaceStatus::Running, WorkspaceStatus::Stopped];

type DetailWaiter = oneshot::Sender<Result<(), Arc<ClientError>>>;

struct ServiceInner<A, F> {
    api: A,
    feed: F,
    directory: Mutex<WorkspaceDirectory>,
    registry: StatusRegistry,
    bus: ChangeBus,
    settings: Mutex<Option<WorkspaceSettings>>,
    subscriptions: Mutex<HashMap<WorkspaceId, Subscription>>,
    pending_details: Mutex<HashMap<String, Vec<DetailWaiter>>>,
    event_tx: mpsc::Sender<StatusEvent>,
}

/// Client-side view of the workspace backend.
///
/// Must be constructed inside a Tokio runtime: creation spawns the
/// event-processing loop.
pub struct WorkspaceService<A, F> {
    inner: Arc<ServiceInner<A, F>>,
}

impl<A, F> Clone for WorkspaceService<A, F> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A, F> WorkspaceService<A, F>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    pub fn new(api: A, feed: F) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let inner = Arc::new(ServiceInner {
            api,
            feed,
            directory: Mutex::new(WorkspaceDirectory::new()),
            registry: StatusRegistry::new(),
            bus: ChangeBus::new(),
            settings: Mutex::new(None),
            subscriptions: Mutex::new(HashMap::new()),
            pending_details: Mutex::new(HashMap::new()),
            event_tx,
        });
        tokio::spawn(event_loop(Arc::downgrade(&inner), event_rx));
        Self { inner }
    }

    // --- reads ---

    /// Last-known status of a workspace.
    pub fn status(&self, id: &WorkspaceId) -> Option<WorkspaceStatus> {
        self.inner.registry.status(id)
    }

    /// Future resolving once the workspace reaches `target`; immediate when
    /// the status already matches.
    pub fn await_status(&self, id: &WorkspaceId, target: WorkspaceStatus) -> StatusWait {
        self.inner.registry.await_status(id, target)
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<Workspace> {
        self.inner.directory.lock().get(id).cloned()
    }

    pub fn workspace_by_name(&self, namespace: &str, name: &str) -> Option<Workspace> {
        self.inner.directory.lock().get_by_name(namespace, name).cloned()
    }

    /// The non-temporary workspace listing.
    pub fn workspaces(&self) -> Vec<Workspace> {
        self.inner.directory.lock().workspaces().to_vec()
    }

    pub fn workspaces_in(&self, namespace: &str) -> Vec<Workspace> {
        self.inner.directory.lock().namespace(namespace).to_vec()
    }

    // --- change notifications ---

    pub fn subscribe_changes(
        &self,
        id: &WorkspaceId,
        handler: impl Fn(&Workspace) + Send + Sync + 'static,
    ) -> HandlerId {
        self.inner.bus.register(id, handler)
    }

    pub fn unsubscribe_changes(&self, id: &WorkspaceId, handler_id: HandlerId) -> bool {
        self.inner.bus.unregister(id, handler_id)
    }

    // --- ingestion ---

    /// Store a fetched workspace and wire everything around it: runtime
    /// preservation, the duplicate-free listing, a change-bus publish, an
    /// idempotent status subscription, and ticket-triggered refetches for the
    /// settled statuses the workspace is not currently in (self-correction
    /// against stale response payloads).
    pub fn upsert(&self, workspace: Workspace) -> Workspace {
        let id = workspace.id.clone();
        let merged = self.inner.directory.lock().upsert(workspace);
        self.inner.registry.set_status(&id, merged.status);
        if !merged.temporary {
            self.inner.bus.publish(&id, &merged);
        }
        self.ensure_subscribed(&id);
        self.schedule_settled_refetch(&merged);
        merged
    }

    /// Subscribe the status-event feed for a workspace id, once.
    fn ensure_subscribed(&self, id: &WorkspaceId) {
        let mut subscriptions = self.inner.subscriptions.lock();
        if subscriptions.contains_key(id) {
            return;
        }
        match self.inner.feed.subscribe(id, self.inner.event_tx.clone()) {
            Ok(subscription) => {
                subscriptions.insert(id.clone(), subscription);
            }
            Err(e) => {
                tracing::warn!(workspace_id = %id, error = %e, "status subscription failed");
            }
        }
    }

    /// A response payload may be stale relative to the true backend status.
    /// For each settled status the workspace is not in, queue a ticket that
    /// refetches the full details once that status is reached.
    fn schedule_settled_refetch(&self, workspace: &Workspace) {
        for settled in SETTLED_STATUSES {
            if workspace.status == settled {
                continue;
            }
            let wait = self.inner.registry.await_status(&workspace.id, settled);
            let weak = Arc::downgrade(&self.inner);
            let key = workspace.id.to_string();
            tokio::spawn(async move {
                let _ = wait.await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let service = WorkspaceService { inner };
                if let Err(e) = service.fetch_details(&key).await {
                    tracing::debug!(workspace_id = %key, error = %e, "post-transition refetch failed");
                }
            });
        }
    }

    // --- fetches ---

    /// Refresh the full workspace listing. HTTP 304 resolves with the cached
    /// listing.
    pub async fn fetch_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        match self.inner.api.query().await {
            Ok(list) => {
                self.inner.directory.lock().clear();
                for workspace in list {
                    self.upsert(workspace);
                }
                Ok(self.workspaces())
            }
            Err(e) if e.is_not_modified() => Ok(self.workspaces()),
            Err(e) => Err(e.into()),
        }
    }

    /// Refresh one namespace's listing, replacing it wholesale.
    pub async fn fetch_namespace(&self, namespace: &str) -> Result<Vec<Workspace>, ClientError> {
        let list = match self.inner.api.query_namespace(namespace).await {
            Ok(list) => list,
            Err(e) if e.is_not_modified() => return Ok(self.workspaces_in(namespace)),
            Err(e) => return Err(e.into()),
        };
        self.inner.directory.lock().set_namespace(namespace, list.clone());
        for workspace in list {
            self.upsert(workspace);
        }
        Ok(self.workspaces_in(namespace))
    }

    /// Fetch full details for a workspace key (id or `namespace:name`).
    ///
    /// Concurrent callers for the same key share one request. HTTP 304
    /// resolves as no-change.
    pub async fn fetch_details(&self, key: &str) -> Result<(), ClientError> {
        let waiter = {
            let mut pending = self.inner.pending_details.lock();
            match pending.get_mut(key) {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    pending.insert(key.to_string(), Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return match rx.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(shared)) => Err(ClientError::Shared(shared)),
                Err(_) => Err(ClientError::Interrupted),
            };
        }

        let result = self.fetch_details_inner(key).await.map_err(Arc::new);
        let waiters = self.inner.pending_details.lock().remove(key).unwrap_or_default();
        for tx in waiters {
            let _ = tx.send(result.clone());
        }
        result.map_err(ClientError::Shared)
    }

    async fn fetch_details_inner(&self, key: &str) -> Result<(), ClientError> {
        match self.inner.api.fetch(key).await {
            Ok(workspace) => {
                self.upsert(workspace);
                Ok(())
            }
            Err(e) if e.is_not_modified() => Ok(()),
            Err(e) => {
                tracing::warn!(%key, error = %e, "workspace details fetch failed");
                Err(e.into())
            }
        }
    }

    /// Fetch and cache the system settings for workspaces.
    pub async fn fetch_settings(&self) -> Result<WorkspaceSettings, ClientError> {
        match self.inner.api.settings().await {
            Ok(settings) => {
                *self.inner.settings.lock() = Some(settings.clone());
                Ok(settings)
            }
            Err(e) if e.is_not_modified() => {
                Ok(self.inner.settings.lock().clone().unwrap_or_default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Auto-snapshot policy. Defaults to on until settings are fetched.
    pub fn auto_snapshot(&self) -> bool {
        match &*self.inner.settings.lock() {
            Some(settings) => settings.auto_snapshot(),
            None => true,
        }
    }

    // --- mutations ---

    pub async fn create_workspace(
        &self,
        config: &WorkspaceConfig,
        namespace: Option<&str>,
        attributes: &[(String, String)],
    ) -> Result<Workspace, ClientError> {
        Ok(self.inner.api.create(config, namespace, attributes).await?)
    }

    /// Submit a workspace update; the response is stored and published.
    pub async fn update_workspace(
        &self,
        id: &WorkspaceId,
        workspace: &Workspace,
    ) -> Result<Workspace, ClientError> {
        let updated = self.inner.api.update(id, workspace).await?;
        Ok(self.upsert(updated))
    }

    pub async fn delete_workspace(&self, id: &WorkspaceId) -> Result<(), ClientError> {
        self.inner.api.delete(id).await?;
        self.inner.directory.lock().remove(id);
        self.inner.registry.forget(id);
        self.inner.subscriptions.lock().remove(id);
        Ok(())
    }

    pub async fn add_project(&self, id: &WorkspaceId, project: &Project) -> Result<(), ClientError> {
        Ok(self.inner.api.add_project(id, project).await?)
    }

    pub async fn delete_project(&self, id: &WorkspaceId, name: &str) -> Result<(), ClientError> {
        Ok(self.inner.api.delete_project(id, name).await?)
    }

    pub async fn add_command(
        &self,
        id: &WorkspaceId,
        command: &CommandDef,
    ) -> Result<(), ClientError> {
        Ok(self.inner.api.add_command(id, command).await?)
    }

    pub async fn start_workspace(
        &self,
        id: &WorkspaceId,
        environment: &str,
    ) -> Result<(), ClientError> {
        Ok(self.inner.api.start(id, environment).await?)
    }

    /// Stop a workspace. `None` falls back to the auto-snapshot setting.
    pub async fn stop_workspace(
        &self,
        id: &WorkspaceId,
        create_snapshot: Option<bool>,
    ) -> Result<(), ClientError> {
        let create_snapshot = create_snapshot.unwrap_or_else(|| self.auto_snapshot());
        Ok(self.inner.api.stop(id, create_snapshot).await?)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl<A, F> WorkspaceService<A, F>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    /// Seed directory, registry, and subscription state without the settled
    /// refetch tickets an `upsert` would queue. Test setup only.
    pub fn seed(&self, workspace: Workspace) {
        let id = workspace.id.clone();
        let status = workspace.status;
        self.inner.directory.lock().upsert(workspace);
        self.inner.registry.set_status(&id, status);
        self.ensure_subscribed(&id);
    }
}

/// Single consumer of the status-event channel: updates the registry (which
/// resolves wait tickets) and mirrors mapped statuses into the directory.
async fn event_loop<A, F>(
    inner: Weak<ServiceInner<A, F>>,
    mut event_rx: mpsc::Receiver<StatusEvent>,
) where
    A: WorkspaceApi,
    F: EventFeed,
{
    while let Some(event) = event_rx.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let mapped = inner.registry.apply_event(&event);
        if let Some(status) = mapped {
            inner.directory.lock().set_status(&event.workspace_id, status);
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
