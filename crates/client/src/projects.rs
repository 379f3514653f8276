// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending project operations queued for the next orchestrated update, plus
//! the delegated sync operations the orchestrator hands off to.

use crate::error::ClientError;
use crate::service::WorkspaceService;
use parking_lot::Mutex;
use wsc_api::{EventFeed, WorkspaceApi};
use wsc_core::{ProjectTemplate, WorkspaceId};

#[derive(Default)]
struct PendingState {
    templates: Vec<ProjectTemplate>,
    deletions: Vec<String>,
}

/// Session-scoped lists of projects to create and remove as part of an
/// in-flight update. Cleared once the orchestrated update completes.
#[derive(Default)]
pub struct PendingProjects {
    inner: Mutex<PendingState>,
}

impl PendingProjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a project template to be created by the next update.
    pub fn add_template(&self, template: ProjectTemplate) {
        self.inner.lock().templates.push(template);
    }

    /// Queue an existing project for removal by the next update.
    pub fn mark_for_deletion(&self, name: impl Into<String>) {
        self.inner.lock().deletions.push(name.into());
    }

    pub fn templates(&self) -> Vec<ProjectTemplate> {
        self.inner.lock().templates.clone()
    }

    pub fn names_to_delete(&self) -> Vec<String> {
        self.inner.lock().deletions.clone()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.inner.lock();
        state.templates.is_empty() && state.deletions.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.templates.clear();
        state.deletions.clear();
    }
}

/// Delete the named projects from a workspace, one by one. The first failure
/// propagates unchanged.
pub async fn delete_projects<A, F>(
    workspaces: &WorkspaceService<A, F>,
    id: &WorkspaceId,
    names: &[String],
) -> Result<(), ClientError>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    for name in names {
        workspaces.delete_project(id, name).await?;
    }
    Ok(())
}

/// Create the commands carried by newly added project templates.
pub async fn add_project_commands<A, F>(
    workspaces: &WorkspaceService<A, F>,
    id: &WorkspaceId,
    templates: &[ProjectTemplate],
) -> Result<(), ClientError>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    for template in templates {
        for command in &template.commands {
            workspaces.add_command(id, command).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
