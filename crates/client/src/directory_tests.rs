// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::workspace;
use wsc_core::WorkspaceRuntime;

fn id(s: &str) -> WorkspaceId {
    WorkspaceId::from_string(s)
}

fn runtime(env: &str) -> WorkspaceRuntime {
    WorkspaceRuntime { active_env: Some(env.to_string()), ..Default::default() }
}

#[test]
fn upsert_preserves_runtime_of_running_entry_on_partial_payload() {
    let mut directory = WorkspaceDirectory::new();

    let mut running = workspace("w1", WorkspaceStatus::Running);
    running.runtime = Some(runtime("default"));
    directory.upsert(running);

    // partial-field response: RUNNING but no runtime
    let stored = directory.upsert(workspace("w1", WorkspaceStatus::Running));

    assert_eq!(stored.runtime, Some(runtime("default")));
    assert_eq!(directory.get(&id("w1")).unwrap().runtime, Some(runtime("default")));
}

#[test]
fn upsert_replaces_runtime_when_incoming_payload_has_one() {
    let mut directory = WorkspaceDirectory::new();

    let mut first = workspace("w1", WorkspaceStatus::Running);
    first.runtime = Some(runtime("default"));
    directory.upsert(first);

    let mut second = workspace("w1", WorkspaceStatus::Running);
    second.runtime = Some(runtime("other"));
    let stored = directory.upsert(second);

    assert_eq!(stored.runtime, Some(runtime("other")));
}

#[test]
fn upsert_replaces_wholesale_when_stored_entry_is_not_running() {
    let mut directory = WorkspaceDirectory::new();

    let mut stopped = workspace("w1", WorkspaceStatus::Stopped);
    stopped.runtime = Some(runtime("leftover"));
    directory.upsert(stopped);

    let stored = directory.upsert(workspace("w1", WorkspaceStatus::Stopped));
    assert_eq!(stored.runtime, None);
}

#[test]
fn listing_never_holds_duplicate_ids() {
    let mut directory = WorkspaceDirectory::new();

    directory.upsert(workspace("w1", WorkspaceStatus::Stopped));
    directory.upsert(workspace("w2", WorkspaceStatus::Stopped));
    directory.upsert(workspace("w1", WorkspaceStatus::Running));

    let ids: Vec<&str> = directory.workspaces().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["w2", "w1"]);
    assert_eq!(directory.workspaces()[1].status, WorkspaceStatus::Running);
}

#[test]
fn temporary_workspaces_stay_out_of_the_listing() {
    let mut directory = WorkspaceDirectory::new();

    let mut temp = workspace("scratch", WorkspaceStatus::Running);
    temp.temporary = true;
    directory.upsert(temp);

    assert!(directory.workspaces().is_empty());
    assert!(directory.get(&id("scratch")).is_some());
}

#[test]
fn set_status_reaches_every_index() {
    let mut directory = WorkspaceDirectory::new();
    directory.upsert(workspace("w1", WorkspaceStatus::Stopped));
    directory.set_namespace("test", vec![workspace("w1", WorkspaceStatus::Stopped)]);

    directory.set_status(&id("w1"), WorkspaceStatus::Starting);

    assert_eq!(directory.get(&id("w1")).unwrap().status, WorkspaceStatus::Starting);
    assert_eq!(directory.workspaces()[0].status, WorkspaceStatus::Starting);
    assert_eq!(directory.namespace("test")[0].status, WorkspaceStatus::Starting);
}

#[test]
fn remove_purges_every_index() {
    let mut directory = WorkspaceDirectory::new();
    directory.upsert(workspace("w1", WorkspaceStatus::Stopped));
    directory.set_namespace("test", vec![workspace("w1", WorkspaceStatus::Stopped)]);

    directory.remove(&id("w1"));

    assert!(directory.get(&id("w1")).is_none());
    assert!(directory.workspaces().is_empty());
    assert!(directory.namespace("test").is_empty());
}

#[test]
fn clear_keeps_namespace_lists() {
    let mut directory = WorkspaceDirectory::new();
    directory.upsert(workspace("w1", WorkspaceStatus::Stopped));
    directory.set_namespace("test", vec![workspace("w1", WorkspaceStatus::Stopped)]);

    directory.clear();

    assert!(directory.workspaces().is_empty());
    assert!(directory.get(&id("w1")).is_none());
    assert_eq!(directory.namespace("test").len(), 1);
}

#[test]
fn get_by_name_matches_namespace_and_config_name() {
    let mut directory = WorkspaceDirectory::new();
    directory.upsert(workspace("w1", WorkspaceStatus::Stopped));

    assert!(directory.get_by_name("test", "w1").is_some());
    assert!(directory.get_by_name("other", "w1").is_none());
    assert!(directory.get_by_name("test", "w2").is_none());
}
