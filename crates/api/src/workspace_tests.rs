// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wsc_core::{WorkspaceConfig, WorkspaceStatus};

#[test]
fn url_building_strips_trailing_slash() {
    let api = HttpWorkspaceApi::new("https://console.example.com/");
    assert_eq!(api.url(""), "https://console.example.com/api/workspace");
    assert_eq!(api.url("/ws-1/runtime"), "https://console.example.com/api/workspace/ws-1/runtime");
}

#[tokio::test]
async fn fake_records_calls_in_order() {
    let api = FakeWorkspaceApi::new();
    let id = wsc_core::WorkspaceId::from_string("ws-1");

    let _ = api.start(&id, "default").await;
    let _ = api.stop(&id, false).await;

    assert_eq!(api.call_names(), vec!["start", "stop"]);
    assert_eq!(
        api.calls()[1],
        ApiCall::Stop { id: id.clone(), create_snapshot: false }
    );
}

#[tokio::test]
async fn fake_injected_error_fires_once() {
    let api = FakeWorkspaceApi::new();
    let id = wsc_core::WorkspaceId::from_string("ws-1");
    api.set_error("stop", ApiError::from_response(500, "boom"));

    assert!(api.stop(&id, true).await.is_err());
    assert!(api.stop(&id, true).await.is_ok());
}

#[tokio::test]
async fn fake_fetch_resolves_namespace_name_keys() {
    let api = FakeWorkspaceApi::new();
    let created = api
        .create(
            &WorkspaceConfig {
                name: "dev".to_string(),
                default_env: "default".to_string(),
                ..Default::default()
            },
            Some("team"),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(created.status, WorkspaceStatus::Stopped);

    let by_id = api.fetch(created.id.as_str()).await.unwrap();
    assert_eq!(by_id.config.name, "dev");

    let by_key = api.fetch("team:dev").await.unwrap();
    assert_eq!(by_key.id, created.id);

    let missing = api.fetch("team:prod").await.unwrap_err();
    assert!(matches!(missing, ApiError::Api { status: 404, .. }));
}
