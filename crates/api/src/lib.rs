// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wsc-api: backend adapters for the Workspace Console client.
//!
//! The workspace HTTP API, the per-workspace WebSocket status-event feed,
//! and the user-notification adapter. Fakes for all three live behind the
//! `test-support` feature.

mod error;
mod feed;
mod notify;
mod workspace;

pub use error::{ApiError, RAM_LIMIT_EXCEEDED};
pub use feed::{EventFeed, FeedError, Subscription, WsEventFeed};
pub use notify::{DesktopNotifier, Notifier, NotifyError};
pub use workspace::{HttpWorkspaceApi, WorkspaceApi};

#[cfg(any(test, feature = "test-support"))]
pub use feed::FakeEventFeed;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use workspace::{ApiCall, FakeWorkspaceApi};
