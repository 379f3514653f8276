// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update orchestrator — sequences a multi-step workspace update: quiesce,
//! reconfigure, restart, project sync, command sync.
//!
//! The sequence is an explicit state machine driven by one loop. Stages run
//! strictly one after another for a given update; a failure aborts the
//! remaining stages and propagates as the `Err` return. There is no
//! cancellation and no built-in timeout — once started, an update runs to
//! completion or failure.

use crate::error::ClientError;
use crate::projects::{self, PendingProjects};
use crate::service::WorkspaceService;
use wsc_api::{ApiError, EventFeed, Notifier, WorkspaceApi, RAM_LIMIT_EXCEEDED};
use wsc_core::{Workspace, WorkspaceId, WorkspaceStatus};

/// Stages of an orchestrated update, in driving order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateState {
    Quiescing,
    Reconfiguring,
    Resuming,
    DeletingProjects,
    AddingCommands,
    Done,
}

/// Sequences workspace updates over a [`WorkspaceService`].
pub struct UpdateService<A, F, N> {
    workspaces: WorkspaceService<A, F>,
    notifier: N,
    pending: PendingProjects,
}

impl<A, F, N> UpdateService<A, F, N>
where
    A: WorkspaceApi,
    F: EventFeed,
    N: Notifier,
{
    pub fn new(workspaces: WorkspaceService<A, F>, notifier: N) -> Self {
        Self { workspaces, notifier, pending: PendingProjects::new() }
    }

    /// The underlying workspace service.
    pub fn workspaces(&self) -> &WorkspaceService<A, F> {
        &self.workspaces
    }

    /// Project operations queued for the next [`apply_changes`](Self::apply_changes).
    pub fn pending(&self) -> &PendingProjects {
        &self.pending
    }

    /// Current status of a workspace.
    pub fn workspace_status(&self, id: &WorkspaceId) -> Option<WorkspaceStatus> {
        self.workspaces.status(id)
    }

    /// Whether the workspace has to be running for the queued changes to
    /// apply (any pending project additions or deletions).
    pub fn need_running_to_update(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The auto-snapshot policy value.
    pub fn auto_snapshot(&self) -> bool {
        self.workspaces.auto_snapshot()
    }

    /// Apply config changes and queued project operations to a workspace.
    ///
    /// Resolves when the full update is applied; fails with the first
    /// encountered error, skipping the remaining stages.
    pub async fn apply_changes(
        &self,
        old_workspace: &Workspace,
        new_workspace: &Workspace,
    ) -> Result<(), ClientError> {
        let templates = self.pending.templates();
        let names_to_delete = self.pending.names_to_delete();
        let has_additions = !templates.is_empty();
        let has_deletions = !names_to_delete.is_empty();
        let config_changed =
            !has_additions && !has_deletions && old_workspace.config != new_workspace.config;

        let mut state = UpdateState::Quiescing;
        loop {
            state = match state {
                UpdateState::Quiescing => {
                    self.quiesce(new_workspace).await?;
                    UpdateState::Reconfiguring
                }
                UpdateState::Reconfiguring => {
                    if has_additions || config_changed {
                        self.apply_config_changes(new_workspace).await?;
                    }
                    UpdateState::Resuming
                }
                UpdateState::Resuming => {
                    self.resume(new_workspace).await?;
                    UpdateState::DeletingProjects
                }
                UpdateState::DeletingProjects => {
                    if has_deletions {
                        projects::delete_projects(
                            &self.workspaces,
                            &new_workspace.id,
                            &names_to_delete,
                        )
                        .await?;
                    }
                    UpdateState::AddingCommands
                }
                UpdateState::AddingCommands => {
                    if has_deletions {
                        projects::add_project_commands(
                            &self.workspaces,
                            &new_workspace.id,
                            &templates,
                        )
                        .await?;
                    }
                    UpdateState::Done
                }
                UpdateState::Done => {
                    self.pending.clear();
                    return Ok(());
                }
            };
        }
    }

    /// Stage 1: bring the workspace to `STOPPED` if it is running or on its
    /// way in either direction.
    async fn quiesce(&self, workspace: &Workspace) -> Result<(), ClientError> {
        match self.workspace_status(&workspace.id) {
            Some(WorkspaceStatus::Starting) | Some(WorkspaceStatus::Running) => {
                self.stop_workspace(&workspace.id, None).await?;
                self.workspaces.await_status(&workspace.id, WorkspaceStatus::Stopped).await;
            }
            Some(WorkspaceStatus::Stopping) | Some(WorkspaceStatus::Snapshotting) => {
                self.workspaces.await_status(&workspace.id, WorkspaceStatus::Stopped).await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Stage 2: submit the new definition.
    async fn apply_config_changes(&self, workspace: &Workspace) -> Result<(), ClientError> {
        let mut payload = workspace.clone();
        // links are server-assigned and must not be echoed back
        payload.links = None;

        match self.workspaces.update_workspace(&workspace.id, &payload).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(workspace_id = %workspace.id, error = %e, "config update failed");
                Err(e)
            }
        }
    }

    /// Stage 3: bring the workspace back to `RUNNING`, then refetch details —
    /// the post-start payload may be stale.
    async fn resume(&self, workspace: &Workspace) -> Result<(), ClientError> {
        match self.workspace_status(&workspace.id) {
            Some(WorkspaceStatus::Running) => return Ok(()),
            Some(WorkspaceStatus::Starting) => {
                self.workspaces.await_status(&workspace.id, WorkspaceStatus::Running).await;
                return Ok(());
            }
            _ => {}
        }

        if let Err(e) = self
            .workspaces
            .start_workspace(&workspace.id, &workspace.config.default_env)
            .await
        {
            return Err(self.fail_start(e).await);
        }
        self.workspaces.await_status(&workspace.id, WorkspaceStatus::Running).await;
        self.workspaces.fetch_details(workspace.id.as_str()).await?;
        Ok(())
    }

    /// Start a workspace and wait for it to be running.
    pub async fn run_workspace(&self, workspace: &Workspace) -> Result<(), ClientError> {
        if let Err(e) = self
            .workspaces
            .start_workspace(&workspace.id, &workspace.config.default_env)
            .await
        {
            return Err(self.fail_start(e).await);
        }
        self.workspaces.await_status(&workspace.id, WorkspaceStatus::Running).await;
        Ok(())
    }

    /// Stop a workspace. The snapshot flag is forced off while the workspace
    /// is still starting; otherwise an unset flag falls back to the
    /// auto-snapshot setting.
    pub async fn stop_workspace(
        &self,
        id: &WorkspaceId,
        create_snapshot: Option<bool>,
    ) -> Result<(), ClientError> {
        let create_snapshot = if self.workspace_status(id) == Some(WorkspaceStatus::Starting) {
            Some(false)
        } else {
            create_snapshot
        };

        match self.workspaces.stop_workspace(id, create_snapshot).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = self.notifier.show_error(&format!("Stop workspace failed. {e}")).await;
                tracing::error!(workspace_id = %id, error = %e, "workspace stop failed");
                Err(e)
            }
        }
    }

    /// Turn a start failure into its user-facing form: notify, log, and wrap
    /// with the formatted message.
    async fn fail_start(&self, error: ClientError) -> ClientError {
        let message = start_error_message(&error);
        let _ = self.notifier.show_error(&message).await;
        tracing::error!(error = %error, "workspace start failed");
        ClientError::StartFailed { message, source: Box::new(error) }
    }
}

/// User-facing message for a failed workspace start.
///
/// A RAM-quota violation (domain code [`RAM_LIMIT_EXCEEDED`]) produces the
/// detailed message enumerating running-workspace count, used RAM, the limit,
/// and the additional RAM this workspace requires.
pub fn start_error_message(error: &ClientError) -> String {
    const GENERIC: &str = "Unable to start this workspace.";

    let Some(api_error) = error.api() else {
        return GENERIC.to_string();
    };
    match api_error {
        ApiError::Api { code: Some(RAM_LIMIT_EXCEEDED), attributes, .. }
            if attributes.contains_key("required_ram") =>
        {
            let attr = |key: &str| attributes.get(key).map(String::as_str).unwrap_or("?");
            let unit = attr("ram_unit");
            format!(
                "{GENERIC} There are {count} running workspaces consuming \
                 {used}{unit} RAM. Your current RAM limit is {limit}{unit}. \
                 This workspace requires an additional {required}{unit}. \
                 You can stop other workspaces to free resources.",
                count = attr("workspaces_count"),
                used = attr("used_ram"),
                limit = attr("limit_ram"),
                required = attr("required_ram"),
            )
        }
        ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
        _ => GENERIC.to_string(),
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
