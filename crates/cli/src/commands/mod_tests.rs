// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wsc_api::{FakeEventFeed, FakeWorkspaceApi};

fn seeded_service() -> (FakeWorkspaceApi, WorkspaceService<FakeWorkspaceApi, FakeEventFeed>) {
    let api = FakeWorkspaceApi::new();
    let service = WorkspaceService::new(api.clone(), FakeEventFeed::new());
    (api, service)
}

fn sample(id: &str) -> Workspace {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "namespace": "team",
        "status": "STOPPED",
        "config": {"name": "dev", "defaultEnv": "default"}
    }))
    .unwrap()
}

#[tokio::test]
async fn resolve_finds_workspace_by_id() {
    let (api, service) = seeded_service();
    api.put_workspace(sample("ws-1"));

    let ws = resolve(&service, "ws-1").await.unwrap();
    assert_eq!(ws.id, "ws-1");
}

#[tokio::test]
async fn resolve_finds_workspace_by_namespace_name_key() {
    let (api, service) = seeded_service();
    api.put_workspace(sample("ws-1"));

    let ws = resolve(&service, "team:dev").await.unwrap();
    assert_eq!(ws.id, "ws-1");
}

#[tokio::test]
async fn resolve_reports_missing_workspaces() {
    let (_api, service) = seeded_service();

    let err = resolve(&service, "ghost").await.unwrap_err();
    assert!(err.to_string().contains("ghost"));
}
