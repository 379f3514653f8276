// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace HTTP API adapter.
//!
//! Route layout mirrors the workspace service REST surface: everything lives
//! under `/api/workspace`, with runtime start/stop modelled as POST/DELETE on
//! the `runtime` sub-resource.

use crate::error::ApiError;
use async_trait::async_trait;
use wsc_core::{CommandDef, Project, Workspace, WorkspaceConfig, WorkspaceId, WorkspaceSettings};

/// Adapter for the workspace management HTTP API.
#[async_trait]
pub trait WorkspaceApi: Clone + Send + Sync + 'static {
    /// All workspaces visible to the caller.
    async fn query(&self) -> Result<Vec<Workspace>, ApiError>;

    /// Workspaces belonging to one namespace.
    async fn query_namespace(&self, namespace: &str) -> Result<Vec<Workspace>, ApiError>;

    /// One workspace by id or `namespace:name` key.
    async fn fetch(&self, key: &str) -> Result<Workspace, ApiError>;

    /// Create a workspace. The namespace parameter is only sent when present.
    async fn create(
        &self,
        config: &WorkspaceConfig,
        namespace: Option<&str>,
        attributes: &[(String, String)],
    ) -> Result<Workspace, ApiError>;

    /// Replace a workspace definition; returns the stored result.
    async fn update(&self, id: &WorkspaceId, workspace: &Workspace) -> Result<Workspace, ApiError>;

    async fn delete(&self, id: &WorkspaceId) -> Result<(), ApiError>;

    async fn add_project(&self, id: &WorkspaceId, project: &Project) -> Result<(), ApiError>;

    async fn delete_project(&self, id: &WorkspaceId, name: &str) -> Result<(), ApiError>;

    async fn add_command(&self, id: &WorkspaceId, command: &CommandDef) -> Result<(), ApiError>;

    /// Start the workspace with the named environment.
    async fn start(&self, id: &WorkspaceId, environment: &str) -> Result<(), ApiError>;

    /// Stop the workspace, optionally snapshotting it first.
    async fn stop(&self, id: &WorkspaceId, create_snapshot: bool) -> Result<(), ApiError>;

    /// System settings for workspaces.
    async fn settings(&self) -> Result<WorkspaceSettings, ApiError>;
}

/// `reqwest`-backed implementation of [`WorkspaceApi`].
#[derive(Clone)]
pub struct HttpWorkspaceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkspaceApi {
    /// `base_url` is scheme + host (+ optional port), without a trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client: reqwest::Client::new(), base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/workspace{}", self.base_url, path)
    }

    /// Map the response status: 304 is surfaced as [`ApiError::NotModified`],
    /// other non-success statuses carry the parsed error body.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_MODIFIED {
            return Err(ApiError::NotModified);
        }
        if status.is_success() {
            return Ok(resp);
        }
        let url = resp.url().clone();
        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        tracing::warn!(%url, status = status.as_u16(), error = %err, "workspace api request failed");
        Err(err)
    }

    async fn json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn unit(resp: reqwest::Response) -> Result<(), ApiError> {
        Self::check(resp).await.map(|_| ())
    }
}

#[async_trait]
impl WorkspaceApi for HttpWorkspaceApi {
    async fn query(&self) -> Result<Vec<Workspace>, ApiError> {
        Self::json(self.client.get(self.url("")).send().await?).await
    }

    async fn query_namespace(&self, namespace: &str) -> Result<Vec<Workspace>, ApiError> {
        Self::json(self.client.get(self.url(&format!("/namespace/{namespace}"))).send().await?)
            .await
    }

    async fn fetch(&self, key: &str) -> Result<Workspace, ApiError> {
        Self::json(self.client.get(self.url(&format!("/{key}"))).send().await?).await
    }

    async fn create(
        &self,
        config: &WorkspaceConfig,
        namespace: Option<&str>,
        attributes: &[(String, String)],
    ) -> Result<Workspace, ApiError> {
        let mut query: Vec<(&str, String)> =
            attributes.iter().map(|(k, v)| ("attribute", format!("{k}:{v}"))).collect();
        if let Some(ns) = namespace {
            query.push(("namespace", ns.to_string()));
        }
        Self::json(self.client.post(self.url("")).query(&query).json(config).send().await?).await
    }

    async fn update(&self, id: &WorkspaceId, workspace: &Workspace) -> Result<Workspace, ApiError> {
        Self::json(self.client.put(self.url(&format!("/{id}"))).json(workspace).send().await?)
            .await
    }

    async fn delete(&self, id: &WorkspaceId) -> Result<(), ApiError> {
        Self::unit(self.client.delete(self.url(&format!("/{id}"))).send().await?).await
    }

    async fn add_project(&self, id: &WorkspaceId, project: &Project) -> Result<(), ApiError> {
        Self::unit(
            self.client.post(self.url(&format!("/{id}/project"))).json(project).send().await?,
        )
        .await
    }

    async fn delete_project(&self, id: &WorkspaceId, name: &str) -> Result<(), ApiError> {
        Self::unit(self.client.delete(self.url(&format!("/{id}/project/{name}"))).send().await?)
            .await
    }

    async fn add_command(&self, id: &WorkspaceId, command: &CommandDef) -> Result<(), ApiError> {
        Self::unit(
            self.client.post(self.url(&format!("/{id}/command"))).json(command).send().await?,
        )
        .await
    }

    async fn start(&self, id: &WorkspaceId, environment: &str) -> Result<(), ApiError> {
        Self::unit(
            self.client
                .post(self.url(&format!("/{id}/runtime")))
                .query(&[("environment", environment)])
                .send()
                .await?,
        )
        .await
    }

    async fn stop(&self, id: &WorkspaceId, create_snapshot: bool) -> Result<(), ApiError> {
        Self::unit(
            self.client
                .delete(self.url(&format!("/{id}/runtime")))
                .query(&[("create-snapshot", create_snapshot)])
                .send()
                .await?,
        )
        .await
    }

    async fn settings(&self) -> Result<WorkspaceSettings, ApiError> {
        Self::json(self.client.get(self.url("/settings")).send().await?).await
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ApiError, WorkspaceApi};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use wsc_core::{
        CommandDef, Project, Workspace, WorkspaceConfig, WorkspaceId, WorkspaceSettings,
    };

    /// Recorded API invocation.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ApiCall {
        Query,
        QueryNamespace(String),
        Fetch(String),
        Create { namespace: Option<String> },
        Update(WorkspaceId),
        Delete(WorkspaceId),
        AddProject { id: WorkspaceId, name: String },
        DeleteProject { id: WorkspaceId, name: String },
        AddCommand { id: WorkspaceId, name: String },
        Start { id: WorkspaceId, environment: String },
        Stop { id: WorkspaceId, create_snapshot: bool },
        Settings,
    }

    impl ApiCall {
        pub fn name(&self) -> &'static str {
            match self {
                ApiCall::Query => "query",
                ApiCall::QueryNamespace(_) => "query_namespace",
                ApiCall::Fetch(_) => "fetch",
                ApiCall::Create { .. } => "create",
                ApiCall::Update(_) => "update",
                ApiCall::Delete(_) => "delete",
                ApiCall::AddProject { .. } => "add_project",
                ApiCall::DeleteProject { .. } => "delete_project",
                ApiCall::AddCommand { .. } => "add_command",
                ApiCall::Start { .. } => "start",
                ApiCall::Stop { .. } => "stop",
                ApiCall::Settings => "settings",
            }
        }
    }

    #[derive(Default)]
    struct FakeApiState {
        workspaces: HashMap<WorkspaceId, Workspace>,
        settings: WorkspaceSettings,
        calls: Vec<ApiCall>,
        errors: HashMap<&'static str, ApiError>,
        delays: HashMap<&'static str, std::time::Duration>,
    }

    /// In-memory [`WorkspaceApi`] recording calls and returning seeded data.
    ///
    /// The status field behaves like the backend's: start/stop move stored
    /// workspaces to `Starting`/`Stopped`, and update responses keep the
    /// stored status rather than echoing the payload's.
    #[derive(Clone, Default)]
    pub struct FakeWorkspaceApi {
        inner: Arc<Mutex<FakeApiState>>,
    }

    impl FakeWorkspaceApi {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a workspace served by `query`/`fetch`.
        pub fn put_workspace(&self, workspace: Workspace) {
            self.inner.lock().workspaces.insert(workspace.id.clone(), workspace);
        }

        pub fn set_settings(&self, settings: WorkspaceSettings) {
            self.inner.lock().settings = settings;
        }

        /// Make the next invocation of `method` fail with `error`.
        pub fn set_error(&self, method: &'static str, error: ApiError) {
            self.inner.lock().errors.insert(method, error);
        }

        /// Delay every invocation of `method`, to widen race windows in tests.
        pub fn set_delay(&self, method: &'static str, delay: std::time::Duration) {
            self.inner.lock().delays.insert(method, delay);
        }

        /// All recorded invocations, in order.
        pub fn calls(&self) -> Vec<ApiCall> {
            self.inner.lock().calls.clone()
        }

        /// Names of recorded invocations, in order.
        pub fn call_names(&self) -> Vec<&'static str> {
            self.inner.lock().calls.iter().map(ApiCall::name).collect()
        }

        async fn record(&self, call: ApiCall) -> Result<(), ApiError> {
            let (delay, result) = {
                let mut state = self.inner.lock();
                let name = call.name();
                state.calls.push(call);
                let result = match state.errors.remove(name) {
                    Some(err) => Err(err),
                    None => Ok(()),
                };
                (state.delays.get(name).copied(), result)
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }

        fn not_found(key: &str) -> ApiError {
            ApiError::Api {
                status: 404,
                code: None,
                message: format!("workspace {key} not found"),
                attributes: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl WorkspaceApi for FakeWorkspaceApi {
        async fn query(&self) -> Result<Vec<Workspace>, ApiError> {
            self.record(ApiCall::Query).await?;
            Ok(self.inner.lock().workspaces.values().cloned().collect())
        }

        async fn query_namespace(&self, namespace: &str) -> Result<Vec<Workspace>, ApiError> {
            self.record(ApiCall::QueryNamespace(namespace.to_string())).await?;
            Ok(self
                .inner
                .lock()
                .workspaces
                .values()
                .filter(|w| w.namespace == namespace)
                .cloned()
                .collect())
        }

        async fn fetch(&self, key: &str) -> Result<Workspace, ApiError> {
            self.record(ApiCall::Fetch(key.to_string())).await?;
            let state = self.inner.lock();
            state
                .workspaces
                .get(key)
                .or_else(|| {
                    state.workspaces.values().find(|w| {
                        key == format!("{}:{}", w.namespace, w.config.name).as_str()
                    })
                })
                .cloned()
                .ok_or_else(|| Self::not_found(key))
        }

        async fn create(
            &self,
            config: &WorkspaceConfig,
            namespace: Option<&str>,
            _attributes: &[(String, String)],
        ) -> Result<Workspace, ApiError> {
            self.record(ApiCall::Create { namespace: namespace.map(str::to_string) }).await?;
            let workspace = Workspace {
                id: WorkspaceId::from_string(format!("ws-{}", config.name)),
                namespace: namespace.unwrap_or("default").to_string(),
                status: wsc_core::WorkspaceStatus::Stopped,
                temporary: false,
                config: config.clone(),
                runtime: None,
                links: None,
            };
            self.inner.lock().workspaces.insert(workspace.id.clone(), workspace.clone());
            Ok(workspace)
        }

        async fn update(
            &self,
            id: &WorkspaceId,
            workspace: &Workspace,
        ) -> Result<Workspace, ApiError> {
            self.record(ApiCall::Update(id.clone())).await?;
            let mut state = self.inner.lock();
            let mut stored = workspace.clone();
            // status is backend-owned; an echoed payload status is ignored
            if let Some(existing) = state.workspaces.get(id) {
                stored.status = existing.status;
            }
            state.workspaces.insert(id.clone(), stored.clone());
            Ok(stored)
        }

        async fn delete(&self, id: &WorkspaceId) -> Result<(), ApiError> {
            self.record(ApiCall::Delete(id.clone())).await?;
            self.inner.lock().workspaces.remove(id);
            Ok(())
        }

        async fn add_project(&self, id: &WorkspaceId, project: &Project) -> Result<(), ApiError> {
            self.record(ApiCall::AddProject { id: id.clone(), name: project.name.clone() }).await
        }

        async fn delete_project(&self, id: &WorkspaceId, name: &str) -> Result<(), ApiError> {
            self.record(ApiCall::DeleteProject { id: id.clone(), name: name.to_string() }).await
        }

        async fn add_command(&self, id: &WorkspaceId, command: &CommandDef) -> Result<(), ApiError> {
            self.record(ApiCall::AddCommand { id: id.clone(), name: command.name.clone() }).await
        }

        async fn start(&self, id: &WorkspaceId, environment: &str) -> Result<(), ApiError> {
            self.record(ApiCall::Start {
                id: id.clone(),
                environment: environment.to_string(),
            })
            .await?;
            if let Some(ws) = self.inner.lock().workspaces.get_mut(id) {
                ws.status = wsc_core::WorkspaceStatus::Starting;
            }
            Ok(())
        }

        async fn stop(&self, id: &WorkspaceId, create_snapshot: bool) -> Result<(), ApiError> {
            self.record(ApiCall::Stop { id: id.clone(), create_snapshot }).await?;
            if let Some(ws) = self.inner.lock().workspaces.get_mut(id) {
                ws.status = wsc_core::WorkspaceStatus::Stopped;
            }
            Ok(())
        }

        async fn settings(&self) -> Result<WorkspaceSettings, ApiError> {
            self.record(ApiCall::Settings).await?;
            Ok(self.inner.lock().settings.clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApiCall, FakeWorkspaceApi};

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
