// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System settings for workspaces, fetched from the backend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property key controlling whether stopping a workspace snapshots it first.
pub const AUTO_SNAPSHOT: &str = "workspace.auto_snapshot";

/// Free-form key/value settings exposed by the workspace API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceSettings(pub IndexMap<String, String>);

impl WorkspaceSettings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the auto-snapshot property is switched on.
    pub fn auto_snapshot(&self) -> bool {
        self.get(AUTO_SNAPSHOT) == Some("true")
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
