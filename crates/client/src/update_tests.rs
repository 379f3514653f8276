// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrated-update scenarios over fake adapters. Status transitions are
//! driven by hand-fired feed events, the way the backend would confirm them.

use super::*;
use crate::test_support::{wait_until, workspace};
use std::sync::Arc;
use wsc_api::{ApiCall, FakeEventFeed, FakeNotifier, FakeWorkspaceApi};
use wsc_core::{CommandDef, ProjectTemplate};

type TestUpdate = UpdateService<FakeWorkspaceApi, FakeEventFeed, FakeNotifier>;

fn id(s: &str) -> WorkspaceId {
    WorkspaceId::from_string(s)
}

fn setup() -> (FakeWorkspaceApi, FakeEventFeed, FakeNotifier, Arc<TestUpdate>) {
    let api = FakeWorkspaceApi::new();
    let feed = FakeEventFeed::new();
    let notifier = FakeNotifier::new();
    let service = WorkspaceService::new(api.clone(), feed.clone());
    let update = Arc::new(UpdateService::new(service, notifier.clone()));
    (api, feed, notifier, update)
}

fn spawn_apply(
    update: &Arc<TestUpdate>,
    old: &Workspace,
    new: &Workspace,
) -> tokio::task::JoinHandle<Result<(), ClientError>> {
    let update = Arc::clone(update);
    let old = old.clone();
    let new = new.clone();
    tokio::spawn(async move { update.apply_changes(&old, &new).await })
}

/// Orchestrator-issued calls; the ancillary self-correcting detail refetches
/// are timing-dependent and asserted separately.
fn non_fetch(api: &FakeWorkspaceApi) -> Vec<&'static str> {
    api.call_names().into_iter().filter(|n| *n != "fetch").collect()
}

fn template(name: &str, commands: &[&str]) -> ProjectTemplate {
    ProjectTemplate {
        name: name.to_string(),
        commands: commands
            .iter()
            .map(|c| CommandDef {
                name: c.to_string(),
                kind: "exec".to_string(),
                command_line: format!("make {c}"),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn quota_error() -> wsc_api::ApiError {
    wsc_api::ApiError::from_response(
        403,
        r#"{
            "message": "Not enough RAM",
            "errorCode": 10000,
            "attributes": {
                "workspaces_count": "2",
                "used_ram": "5",
                "limit_ram": "6",
                "required_ram": "2",
                "ram_unit": "GB"
            }
        }"#,
    )
}

#[tokio::test]
async fn running_config_change_stops_reconfigures_and_restarts() {
    let (api, feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Running);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());

    let mut new = old.clone();
    new.config.description = Some("bigger machine".to_string());

    let task = spawn_apply(&update, &old, &new);

    wait_until("stop issued", || api.call_names().contains(&"stop")).await;
    feed.fire("w1", "STOPPED").await;
    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();

    assert_eq!(non_fetch(&api), vec!["stop", "update", "start"]);
    // quiesce applied the auto-snapshot policy (defaults on)
    assert_eq!(api.calls()[0], ApiCall::Stop { id: id("w1"), create_snapshot: true });
    // the post-start refetch was issued
    assert!(api.call_names().contains(&"fetch"));
}

#[tokio::test]
async fn stopped_workspace_with_template_adds_skips_the_stop_call() {
    let (api, feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());
    update.pending().add_template(template("api", &["build"]));

    let task = spawn_apply(&update, &old, &old);

    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();

    assert_eq!(non_fetch(&api), vec!["update", "start"]);
    // command creation is gated on queued deletions, and none were queued
    assert!(!api.call_names().contains(&"add_command"));
    assert!(update.pending().is_empty(), "pending lists clear on completion");
}

#[tokio::test]
async fn stopping_workspace_waits_for_stopped_without_issuing_stop() {
    let (api, feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Snapshotting);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());

    let mut new = old.clone();
    new.config.description = Some("changed".to_string());

    let task = spawn_apply(&update, &old, &new);

    feed.fire("w1", "STOPPED").await;
    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();
    assert_eq!(non_fetch(&api), vec!["update", "start"]);
}

#[tokio::test]
async fn no_diff_update_still_restarts_a_stopped_workspace() {
    let (api, feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());

    let task = spawn_apply(&update, &old, &old);

    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();
    assert_eq!(non_fetch(&api), vec!["start"]);
}

#[tokio::test]
async fn deletions_drive_project_sync_and_command_sync() {
    let (api, feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Running);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());
    update.pending().add_template(template("api", &["build", "test"]));
    update.pending().mark_for_deletion("legacy");

    let task = spawn_apply(&update, &old, &old);

    wait_until("stop issued", || api.call_names().contains(&"stop")).await;
    feed.fire("w1", "STOPPED").await;
    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();

    assert_eq!(
        non_fetch(&api),
        vec!["stop", "update", "start", "delete_project", "add_command", "add_command"]
    );
    assert!(update.pending().is_empty());
}

#[tokio::test]
async fn reconfigure_failure_aborts_before_any_start() {
    let (api, _feed, _notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());
    api.set_error("update", wsc_api::ApiError::from_response(500, "boom"));

    let mut new = old.clone();
    new.config.description = Some("changed".to_string());

    let result = update.apply_changes(&old, &new).await;

    let err = result.unwrap_err();
    assert!(matches!(err.api(), Some(wsc_api::ApiError::Api { status: 500, .. })));
    assert!(api.call_names().contains(&"update"));
    assert!(!api.call_names().contains(&"start"));
}

#[tokio::test]
async fn start_failure_aborts_with_notified_message() {
    let (api, _feed, notifier, update) = setup();
    let old = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(old.clone());
    update.workspaces().seed(old.clone());
    api.set_error("start", wsc_api::ApiError::from_response(500, "boom"));

    let mut new = old.clone();
    new.config.description = Some("changed".to_string());

    let err = update.apply_changes(&old, &new).await.unwrap_err();

    assert!(matches!(err, ClientError::StartFailed { .. }));
    assert_eq!(notifier.messages(), vec!["boom".to_string()]);
    assert!(!api.call_names().contains(&"delete_project"));
}

#[tokio::test]
async fn quota_violation_produces_the_detailed_message() {
    let (api, _feed, notifier, update) = setup();
    let ws = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(ws.clone());
    update.workspaces().seed(ws.clone());
    api.set_error("start", quota_error());

    let err = update.run_workspace(&ws).await.unwrap_err();

    let expected = "Unable to start this workspace. There are 2 running workspaces \
                    consuming 5GB RAM. Your current RAM limit is 6GB. This workspace \
                    requires an additional 2GB. You can stop other workspaces to free \
                    resources.";
    assert_eq!(err.to_string(), expected);
    assert_eq!(notifier.messages(), vec![expected.to_string()]);
}

#[tokio::test]
async fn run_workspace_starts_and_waits_for_running() {
    let (api, feed, notifier, update) = setup();
    let ws = workspace("w1", WorkspaceStatus::Stopped);
    api.put_workspace(ws.clone());
    update.workspaces().seed(ws.clone());

    let task = {
        let update = Arc::clone(&update);
        let ws = ws.clone();
        tokio::spawn(async move { update.run_workspace(&ws).await })
    };

    wait_until("start issued", || api.call_names().contains(&"start")).await;
    feed.fire("w1", "RUNNING").await;

    task.await.unwrap().unwrap();
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn stop_on_starting_workspace_forces_snapshot_off() {
    let (api, _feed, _notifier, update) = setup();
    update.workspaces().seed(workspace("w1", WorkspaceStatus::Starting));

    update.stop_workspace(&id("w1"), None).await.unwrap();
    update.stop_workspace(&id("w1"), Some(true)).await.unwrap();

    for call in api.calls() {
        assert_eq!(call, ApiCall::Stop { id: id("w1"), create_snapshot: false });
    }
}

#[tokio::test]
async fn stop_failure_notifies_and_propagates() {
    let (api, _feed, notifier, update) = setup();
    update.workspaces().seed(workspace("w1", WorkspaceStatus::Running));
    api.set_error("stop", wsc_api::ApiError::from_response(500, "boom"));

    let result = update.stop_workspace(&id("w1"), None).await;

    assert!(result.is_err());
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].starts_with("Stop workspace failed."));
}

#[tokio::test]
async fn need_running_to_update_tracks_pending_project_work() {
    let (_api, _feed, _notifier, update) = setup();
    assert!(!update.need_running_to_update());

    update.pending().add_template(template("api", &[]));
    assert!(update.need_running_to_update());

    update.pending().clear();
    update.pending().mark_for_deletion("legacy");
    assert!(update.need_running_to_update());
}

#[tokio::test]
async fn concurrent_status_waiters_resolve_on_one_event() {
    let (_api, feed, _notifier, update) = setup();
    update.workspaces().seed(workspace("w1", WorkspaceStatus::Stopped));

    let first = update.workspaces().await_status(&id("w1"), WorkspaceStatus::Running);
    let second = update.workspaces().await_status(&id("w1"), WorkspaceStatus::Running);

    feed.fire("w1", "RUNNING").await;

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().event_type, "RUNNING");
    assert_eq!(second.unwrap().event_type, "RUNNING");
}
