// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::service::WorkspaceService;
use wsc_api::{ApiCall, ApiError, FakeEventFeed, FakeWorkspaceApi};
use wsc_core::CommandDef;

fn id(s: &str) -> WorkspaceId {
    WorkspaceId::from_string(s)
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

fn setup() -> (FakeWorkspaceApi, WorkspaceService<FakeWorkspaceApi, FakeEventFeed>) {
    let api = FakeWorkspaceApi::new();
    let service = WorkspaceService::new(api.clone(), FakeEventFeed::new());
    (api, service)
}

#[test]
fn pending_lists_accumulate_and_clear() {
    let pending = PendingProjects::new();
    assert!(pending.is_empty());

    pending.add_template(template("api", &[]));
    pending.mark_for_deletion("old");

    assert_eq!(pending.templates().len(), 1);
    assert_eq!(pending.names_to_delete(), vec!["old".to_string()]);
    assert!(!pending.is_empty());

    pending.clear();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn delete_projects_removes_each_name_in_order() {
    let (api, service) = setup();
    let names = vec!["first".to_string(), "second".to_string()];

    delete_projects(&service, &id("w1"), &names).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            ApiCall::DeleteProject { id: id("w1"), name: "first".to_string() },
            ApiCall::DeleteProject { id: id("w1"), name: "second".to_string() },
        ]
    );
}

#[tokio::test]
async fn delete_projects_stops_at_the_first_failure() {
    let (api, service) = setup();
    api.set_error("delete_project", ApiError::from_response(500, "boom"));
    let names = vec!["first".to_string(), "second".to_string()];

    let result = delete_projects(&service, &id("w1"), &names).await;

    assert!(result.is_err());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn add_project_commands_covers_every_template_command() {
    let (api, service) = setup();
    let templates = vec![template("api", &["build", "test"]), template("web", &["bundle"])];

    add_project_commands(&service, &id("w1"), &templates).await.unwrap();

    let names: Vec<String> = api
        .calls()
        .into_iter()
        .map(|c| match c {
            ApiCall::AddCommand { name, .. } => name,
            other => panic!("unexpected call: {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["build", "test", "bundle"]);
}
