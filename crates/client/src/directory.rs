// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory workspace index — single source of truth for "current"
//! workspace state. Pure storage; side effects (publishing, subscriptions,
//! refetch scheduling) are composed by the workspace service.

use std::collections::HashMap;
use wsc_core::{Workspace, WorkspaceId, WorkspaceStatus};

/// Index of workspaces by id, by namespace, and as the non-temporary listing.
#[derive(Default)]
pub struct WorkspaceDirectory {
    /// Non-temporary workspaces, no duplicate ids.
    workspaces: Vec<Workspace>,
    by_id: HashMap<WorkspaceId, Workspace>,
    by_namespace: HashMap<String, Vec<Workspace>>,
}

impl WorkspaceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched workspace, returning the snapshot actually stored.
    ///
    /// The entry is replaced wholesale, except that a payload omitting
    /// `runtime` while the stored entry is `RUNNING` with a runtime keeps the
    /// stored runtime — a partial-field response must not discard live
    /// runtime data.
    pub fn upsert(&mut self, mut workspace: Workspace) -> Workspace {
        if let Some(existing) = self.by_id.get(&workspace.id) {
            if existing.status == WorkspaceStatus::Running
                && existing.runtime.is_some()
                && workspace.runtime.is_none()
            {
                workspace.runtime = existing.runtime.clone();
            }
        }

        if !workspace.temporary {
            self.workspaces.retain(|w| w.id != workspace.id);
            self.workspaces.push(workspace.clone());
        }

        self.by_id.insert(workspace.id.clone(), workspace.clone());
        workspace
    }

    pub fn get(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.by_id.get(id)
    }

    /// Look up a non-temporary workspace by namespace and config name.
    pub fn get_by_name(&self, namespace: &str, name: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.namespace == namespace && w.config.name == name)
    }

    /// The non-temporary listing, in insertion order.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Workspaces of one namespace, as last replaced by a namespace fetch.
    pub fn namespace(&self, namespace: &str) -> &[Workspace] {
        self.by_namespace.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace a namespace's list wholesale.
    pub fn set_namespace(&mut self, namespace: &str, workspaces: Vec<Workspace>) {
        self.by_namespace.insert(namespace.to_string(), workspaces);
    }

    /// Mutate the stored status in place, everywhere the workspace appears.
    pub fn set_status(&mut self, id: &WorkspaceId, status: WorkspaceStatus) {
        if let Some(ws) = self.by_id.get_mut(id) {
            ws.status = status;
        }
        if let Some(ws) = self.workspaces.iter_mut().find(|w| w.id == *id) {
            ws.status = status;
        }
        for list in self.by_namespace.values_mut() {
            if let Some(ws) = list.iter_mut().find(|w| w.id == *id) {
                ws.status = status;
            }
        }
    }

    /// Remove a deleted workspace from every index.
    pub fn remove(&mut self, id: &WorkspaceId) {
        self.by_id.remove(id);
        self.workspaces.retain(|w| w.id != *id);
        for list in self.by_namespace.values_mut() {
            list.retain(|w| w.id != *id);
        }
    }

    /// Drop the listing and by-id entries ahead of a full refetch. Namespace
    /// lists are owned by namespace fetches and stay.
    pub fn clear(&mut self) {
        self.workspaces.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
