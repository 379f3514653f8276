// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace configuration: environments, machines, projects, commands.
//!
//! `WorkspaceConfig` derives `PartialEq` so callers can decide whether a
//! reconfigure is needed by structural comparison of the whole subtree.

use crate::project::{CommandDef, Project};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration subtree of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    /// Name of the environment started by default.
    #[serde(rename = "defaultEnv")]
    pub default_env: String,
    #[serde(default)]
    pub environments: IndexMap<String, Environment>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named environment definition within a workspace config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    #[serde(default)]
    pub machines: IndexMap<String, Machine>,
}

/// Recipe describing how an environment is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A machine within an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub agents: Vec<String>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
