// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for this crate's tests and downstream integration tests.

use std::time::Duration;
use wsc_core::{Workspace, WorkspaceConfig, WorkspaceId, WorkspaceStatus};

/// A minimal workspace in the given status.
pub fn workspace(id: &str, status: WorkspaceStatus) -> Workspace {
    Workspace {
        id: WorkspaceId::from_string(id),
        namespace: "test".to_string(),
        status,
        temporary: false,
        config: config(id),
        runtime: None,
        links: None,
    }
}

/// A minimal config named after the workspace.
pub fn config(name: &str) -> WorkspaceConfig {
    WorkspaceConfig {
        name: name.to_string(),
        default_env: "default".to_string(),
        ..Default::default()
    }
}

/// Poll `predicate` until it holds, or panic after two seconds.
pub async fn wait_until(description: &str, predicate: impl Fn() -> bool) {
    for _ in 0..200 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting until: {description}");
}
