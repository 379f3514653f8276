// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `wsc` - Workspace Console command line client

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wsc_api::{DesktopNotifier, HttpWorkspaceApi, WsEventFeed};
use wsc_client::{UpdateService, WorkspaceService};

#[derive(Parser)]
#[command(name = "wsc", version, about = "Workspace Console client")]
struct Cli {
    /// Base URL of the workspace API
    #[arg(long, env = "WSC_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List workspaces
    List,
    /// Show details of a workspace
    Show {
        /// Workspace ID or namespace:name key
        key: String,
    },
    /// Start a workspace and wait until it is running
    Start {
        /// Workspace ID or namespace:name key
        key: String,
    },
    /// Stop a workspace and wait until it is stopped
    Stop {
        /// Workspace ID or namespace:name key
        key: String,

        /// Snapshot before stopping (defaults to the server's auto-snapshot
        /// setting)
        #[arg(long)]
        snapshot: Option<bool>,
    },
    /// Delete a workspace
    Delete {
        /// Workspace ID or namespace:name key
        key: String,
    },
    /// Apply a new definition and queued project changes to a workspace
    Update(commands::update::UpdateArgs),
    /// Show the system settings for workspaces
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wsc=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api = HttpWorkspaceApi::new(cli.api_url.as_str());
    let feed = WsEventFeed::from_api_url(&cli.api_url);
    let workspaces = WorkspaceService::new(api, feed);
    let update = UpdateService::new(workspaces.clone(), DesktopNotifier::new());

    // Settings drive the snapshot-on-stop default; a failure here just keeps
    // the built-in default.
    if let Err(e) = workspaces.fetch_settings().await {
        tracing::debug!(error = %e, "settings fetch failed, using defaults");
    }

    match cli.command {
        Command::List => commands::list(&workspaces).await,
        Command::Show { key } => commands::show(&workspaces, &key).await,
        Command::Start { key } => commands::start(&update, &key).await,
        Command::Stop { key, snapshot } => commands::stop(&update, &key, snapshot).await,
        Command::Delete { key } => commands::delete(&workspaces, &key).await,
        Command::Update(args) => commands::update::handle(&update, args).await,
        Command::Settings => commands::settings(&workspaces).await,
    }
}
