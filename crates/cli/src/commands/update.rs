// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wsc update` - apply a new definition and queued project changes

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use wsc_api::{EventFeed, Notifier, WorkspaceApi};
use wsc_client::UpdateService;
use wsc_core::{ProjectTemplate, WorkspaceConfig};

#[derive(Args)]
pub struct UpdateArgs {
    /// Workspace ID or namespace:name key
    pub key: String,

    /// Path to the new workspace config (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Project template JSON file to create (repeatable)
    #[arg(long = "add-project", value_name = "FILE")]
    pub add_projects: Vec<PathBuf>,

    /// Name of an existing project to remove (repeatable)
    #[arg(long = "delete-project", value_name = "NAME")]
    pub delete_projects: Vec<String>,
}

pub async fn handle<A, F, N>(update: &UpdateService<A, F, N>, args: UpdateArgs) -> Result<()>
where
    A: WorkspaceApi,
    F: EventFeed,
    N: Notifier,
{
    let old = super::resolve(update.workspaces(), &args.key).await?;

    let mut new = old.clone();
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: WorkspaceConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        new.config = config;
    }

    for path in &args.add_projects {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading project template {}", path.display()))?;
        let template: ProjectTemplate = serde_json::from_str(&raw)
            .with_context(|| format!("parsing project template {}", path.display()))?;
        update.pending().add_template(template);
    }
    for name in &args.delete_projects {
        update.pending().mark_for_deletion(name.clone());
    }

    update.apply_changes(&old, &new).await?;
    println!("Workspace {} updated", new.id);
    Ok(())
}
