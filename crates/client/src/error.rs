// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for client-side workspace operations.

use std::sync::Arc;
use thiserror::Error;
use wsc_api::ApiError;

/// Errors surfaced by the workspace service and the update orchestrator.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Start failure carrying the user-facing message that was shown.
    #[error("{message}")]
    StartFailed {
        message: String,
        #[source]
        source: Box<ClientError>,
    },

    /// Failure of a detail fetch another caller was already performing.
    #[error("{0}")]
    Shared(Arc<ClientError>),

    /// The in-flight detail fetch this caller piggybacked on went away.
    #[error("detail fetch interrupted")]
    Interrupted,
}

impl ClientError {
    /// The API error underneath, unwrapping shared and start-failure layers.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            ClientError::StartFailed { source, .. } => source.api(),
            ClientError::Shared(inner) => inner.api(),
            ClientError::Interrupted => None,
        }
    }
}
