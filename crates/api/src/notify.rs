// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for surfacing user-facing error notifications.
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Show an error message to the user.
    async fn show_error(&self, message: &str) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to
/// send notifications via the Notification Center. The first notification
/// triggers `ensure_application_set()` which runs an AppleScript to look up a
/// bundle identifier. In a headless context without Automation permissions,
/// that AppleScript blocks forever. We pre-set the bundle identifier at
/// construction time to bypass the lookup entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn show_error(&self, message: &str) -> Result<(), NotifyError> {
        let message = message.to_string();
        // notify_rust::Notification::show() is synchronous on macOS.
        // Fire-and-forget on tokio's bounded blocking thread pool to avoid
        // blocking the async runtime while capping OS thread count.
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary("Workspace error").body(&message).show()
            {
                Ok(_) => {
                    tracing::info!(%message, "error notification sent");
                }
                Err(e) => {
                    tracing::warn!(%message, error = %e, "error notification failed");
                }
            }
        });
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Notifier, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fake notifier recording every message for assertions.
    #[derive(Clone, Default)]
    pub struct FakeNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// All error messages shown so far.
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn show_error(&self, message: &str) -> Result<(), NotifyError> {
            self.messages.lock().push(message.to_string());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;
