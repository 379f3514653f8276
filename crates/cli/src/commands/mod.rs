// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod update;

use anyhow::{Context, Result};
use wsc_api::{EventFeed, Notifier, WorkspaceApi};
use wsc_client::{UpdateService, WorkspaceService};
use wsc_core::{Workspace, WorkspaceId, WorkspaceStatus};

/// Fetch fresh details for a key (id or `namespace:name`) and return the
/// stored workspace.
async fn resolve<A, F>(workspaces: &WorkspaceService<A, F>, key: &str) -> Result<Workspace>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    workspaces.fetch_details(key).await?;
    lookup(workspaces, key).with_context(|| format!("workspace not found: {key}"))
}

fn lookup<A, F>(workspaces: &WorkspaceService<A, F>, key: &str) -> Option<Workspace>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    if let Some(ws) = workspaces.workspace(&WorkspaceId::from(key)) {
        return Some(ws);
    }
    let (namespace, name) = key.split_once(':')?;
    workspaces.workspace_by_name(namespace, name)
}

pub async fn list<A, F>(workspaces: &WorkspaceService<A, F>) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    let list = workspaces.fetch_workspaces().await?;
    if list.is_empty() {
        println!("No workspaces");
        return Ok(());
    }
    println!("{:<28} {:<16} {:<24} {}", "ID", "NAMESPACE", "NAME", "STATUS");
    for ws in list {
        println!("{:<28} {:<16} {:<24} {}", ws.id, ws.namespace, ws.config.name, ws.status);
    }
    Ok(())
}

pub async fn show<A, F>(workspaces: &WorkspaceService<A, F>, key: &str) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    let ws = resolve(workspaces, key).await?;
    println!("Workspace: {}", ws.id);
    println!("  Namespace:   {}", ws.namespace);
    println!("  Name:        {}", ws.config.name);
    println!("  Status:      {}", ws.status);
    println!("  Default env: {}", ws.config.default_env);
    if !ws.config.projects.is_empty() {
        println!("  Projects:");
        for project in &ws.config.projects {
            println!("    {}", project.name);
        }
    }
    if !ws.config.commands.is_empty() {
        println!("  Commands:");
        for command in &ws.config.commands {
            println!("    {} ({})", command.name, command.command_line);
        }
    }
    if let Some(runtime) = &ws.runtime {
        println!("  Runtime:     active env {}", runtime.active_env.as_deref().unwrap_or("-"));
    }
    Ok(())
}

pub async fn start<A, F, N>(update: &UpdateService<A, F, N>, key: &str) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
    N: Notifier,
{
    let ws = resolve(update.workspaces(), key).await?;
    update.run_workspace(&ws).await?;
    println!("Workspace {} is running", ws.id);
    Ok(())
}

pub async fn stop<A, F, N>(
    update: &UpdateService<A, F, N>,
    key: &str,
    snapshot: Option<bool>,
) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
    N: Notifier,
{
    let ws = resolve(update.workspaces(), key).await?;
    update.stop_workspace(&ws.id, snapshot).await?;
    update.workspaces().await_status(&ws.id, WorkspaceStatus::Stopped).await;
    println!("Workspace {} stopped", ws.id);
    Ok(())
}

pub async fn delete<A, F>(workspaces: &WorkspaceService<A, F>, key: &str) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    let ws = resolve(workspaces, key).await?;
    workspaces.delete_workspace(&ws.id).await?;
    println!("Workspace {} deleted", ws.id);
    Ok(())
}

pub async fn settings<A, F>(workspaces: &WorkspaceService<A, F>) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
{
    let settings = workspaces.fetch_settings().await?;
    if settings.0.is_empty() {
        println!("No settings");
        return Ok(());
    }
    for (key, value) in &settings.0 {
        println!("{key} = {value}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
