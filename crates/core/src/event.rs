// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle status events delivered over the per-workspace event feed.

use crate::workspace::{WorkspaceId, WorkspaceStatus};
use serde::{Deserialize, Serialize};

/// A status-transition event emitted by the backend for one workspace.
///
/// `event_type` is an open string set: the status enumeration values plus
/// snapshot progress markers, and whatever the backend adds later. Unknown
/// types carry no status change but still resolve wait tickets keyed by the
/// raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    #[serde(rename = "workspaceId")]
    pub workspace_id: WorkspaceId,
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusEvent {
    pub fn new(workspace_id: impl Into<WorkspaceId>, event_type: impl Into<String>) -> Self {
        Self { workspace_id: workspace_id.into(), event_type: event_type.into(), error: None }
    }

    /// The status this event moves the workspace to, if any.
    ///
    /// Snapshots can only be taken of a running workspace, so
    /// `SNAPSHOT_CREATED` implies the workspace is running again.
    pub fn status(&self) -> Option<WorkspaceStatus> {
        match self.event_type.as_str() {
            "SNAPSHOT_CREATING" => Some(WorkspaceStatus::Snapshotting),
            "SNAPSHOT_CREATED" => Some(WorkspaceStatus::Running),
            other => other.parse().ok(),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
