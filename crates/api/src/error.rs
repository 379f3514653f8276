// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the workspace HTTP API.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Domain error code reported when starting a workspace would exceed the
/// account's RAM limit.
pub const RAM_LIMIT_EXCEEDED: i64 = 10000;

/// Errors from workspace API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or protocol failure before a response body was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 304 — the cached copy is still current. Not a failure.
    #[error("not modified")]
    NotModified,

    /// Non-success response with a (possibly structured) error body.
    #[error("api error ({status}): {message}")]
    Api {
        status: u16,
        /// Domain error code embedded in the body, e.g. [`RAM_LIMIT_EXCEEDED`].
        code: Option<i64>,
        message: String,
        attributes: HashMap<String, String>,
    },
}

/// JSON error body shape returned by the workspace service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "errorCode")]
    error_code: Option<i64>,
    #[serde(default)]
    attributes: HashMap<String, serde_json::Value>,
}

impl ApiError {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, ApiError::NotModified)
    }

    /// Domain error code, when the backend reported one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// Attribute from a structured error body, stringified.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            ApiError::Api { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// Build an [`ApiError::Api`] from a non-success response body.
    ///
    /// Bodies that are not the structured shape are carried verbatim as the
    /// message so nothing the backend said is lost.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ApiError::Api {
                status,
                code: parsed.error_code,
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("request failed with status {status}")),
                attributes: parsed
                    .attributes
                    .into_iter()
                    .map(|(k, v)| (k, stringify(v)))
                    .collect(),
            },
            Err(_) => ApiError::Api {
                status,
                code: None,
                message: if body.is_empty() {
                    format!("request failed with status {status}")
                } else {
                    body.to_string()
                },
                attributes: HashMap::new(),
            },
        }
    }
}

/// Attribute values arrive as strings or numbers depending on the endpoint.
fn stringify(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
