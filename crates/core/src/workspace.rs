// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace identifier, lifecycle status, and the workspace record.
//!
//! A workspace is created server-side; the client fetches it into the
//! directory and mutates it in place as status events and detail refreshes
//! arrive. Exactly one status value per workspace at any time — transitions
//! are driven exclusively by the backend.

use crate::config::WorkspaceConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

crate::define_id! {
    /// Unique identifier for a workspace, minted by the backend.
    pub struct WorkspaceId;
}

/// Lifecycle status of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    Running,
    Stopped,
    Paused,
    Starting,
    Stopping,
    Snapshotting,
    Error,
}

impl WorkspaceStatus {
    /// Wire representation, as carried by status events.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceStatus::Running => "RUNNING",
            WorkspaceStatus::Stopped => "STOPPED",
            WorkspaceStatus::Paused => "PAUSED",
            WorkspaceStatus::Starting => "STARTING",
            WorkspaceStatus::Stopping => "STOPPING",
            WorkspaceStatus::Snapshotting => "SNAPSHOTTING",
            WorkspaceStatus::Error => "ERROR",
        }
    }
}

crate::simple_display! {
    WorkspaceStatus {
        Running => "RUNNING",
        Stopped => "STOPPED",
        Paused => "PAUSED",
        Starting => "STARTING",
        Stopping => "STOPPING",
        Snapshotting => "SNAPSHOTTING",
        Error => "ERROR",
    }
}

/// Error returned when a string is not a known workspace status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workspace status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for WorkspaceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(WorkspaceStatus::Running),
            "STOPPED" => Ok(WorkspaceStatus::Stopped),
            "PAUSED" => Ok(WorkspaceStatus::Paused),
            "STARTING" => Ok(WorkspaceStatus::Starting),
            "STOPPING" => Ok(WorkspaceStatus::Stopping),
            "SNAPSHOTTING" => Ok(WorkspaceStatus::Snapshotting),
            "ERROR" => Ok(WorkspaceStatus::Error),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Runtime snapshot of a running workspace. Present only while running;
/// the server omits it entirely otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRuntime {
    #[serde(default, rename = "activeEnv", skip_serializing_if = "Option::is_none")]
    pub active_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machines: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

/// A workspace as returned by the backend API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub namespace: String,
    pub status: WorkspaceStatus,
    /// Temporary workspaces never enter the non-temporary listing.
    #[serde(default)]
    pub temporary: bool,
    pub config: WorkspaceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<WorkspaceRuntime>,
    /// Server-assigned hyperlinks. Must not be echoed back on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
