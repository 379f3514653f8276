// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket status-event feed — one bridge task per subscribed workspace,
//! translating backend frames into [`StatusEvent`] values.

use futures_util::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use wsc_core::{StatusEvent, WorkspaceId};

/// Errors from event feed subscriptions.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("subscribe failed: {0}")]
    Subscribe(String),
}

/// Handle for an active per-workspace subscription. Dropping it shuts the
/// bridge task down.
pub struct Subscription {
    _shutdown: oneshot::Sender<()>,
}

impl Subscription {
    pub(crate) fn new(shutdown: oneshot::Sender<()>) -> Self {
        Self { _shutdown: shutdown }
    }
}

/// Adapter for the per-workspace status-event channel.
pub trait EventFeed: Clone + Send + Sync + 'static {
    /// Open a subscription for one workspace; events are delivered into
    /// `events` in backend emission order.
    fn subscribe(
        &self,
        workspace_id: &WorkspaceId,
        events: mpsc::Sender<StatusEvent>,
    ) -> Result<Subscription, FeedError>;
}

/// WebSocket-backed [`EventFeed`].
#[derive(Clone)]
pub struct WsEventFeed {
    ws_base: String,
}

impl WsEventFeed {
    /// `ws_base` is the WebSocket origin, e.g. `wss://host:port`.
    pub fn new(ws_base: impl Into<String>) -> Self {
        let mut ws_base = ws_base.into();
        while ws_base.ends_with('/') {
            ws_base.pop();
        }
        Self { ws_base }
    }

    /// Derive the WebSocket origin from the HTTP API url (http → ws,
    /// https → wss).
    pub fn from_api_url(api_url: &str) -> Self {
        Self::new(api_url.replacen("http", "ws", 1))
    }
}

impl EventFeed for WsEventFeed {
    fn subscribe(
        &self,
        workspace_id: &WorkspaceId,
        events: mpsc::Sender<StatusEvent>,
    ) -> Result<Subscription, FeedError> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let url = format!("{}/api/websocket/workspace/{}", self.ws_base, workspace_id);
        tokio::spawn(event_bridge(url, workspace_id.clone(), events, shutdown_rx));
        Ok(Subscription::new(shutdown_tx))
    }
}

/// Background task that reads status frames for one workspace and forwards
/// them until the stream ends or the subscription is dropped.
async fn event_bridge(
    url: String,
    workspace_id: WorkspaceId,
    events: mpsc::Sender<StatusEvent>,
    shutdown_rx: oneshot::Receiver<()>,
) {
    let mut shutdown_rx = shutdown_rx;

    let ws_stream = match connect(&url).await {
        Some(s) => {
            tracing::info!(%workspace_id, "event bridge connected");
            s
        }
        None => {
            tracing::warn!(%workspace_id, %url, "event bridge: connection failed");
            return;
        }
    };

    let (_, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = parse_status_frame(&text, &workspace_id) {
                            tracing::debug!(%workspace_id, event_type = %event.event_type, "status event");
                            if events.send(event).await.is_err() {
                                // receiver gone, the service is shutting down
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(%workspace_id, ?frame, "event bridge: received close frame");
                        break;
                    }
                    None => {
                        tracing::info!(%workspace_id, "event bridge: stream ended");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(%workspace_id, error = %e, "event bridge: error");
                        break;
                    }
                    _ => {} // Ping/Pong/Binary — ignore
                }
            }
            _ = &mut shutdown_rx => {
                break;
            }
        }
    }
}

/// Connect the status WebSocket, retrying while the backend comes up.
async fn connect(url: &str) -> Option<WebSocketStream<MaybeTlsStream<TcpStream>>> {
    for i in 0..10 {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        match tokio_tungstenite::connect_async(url).await {
            Ok((ws, _)) => return Some(ws),
            Err(e) => {
                tracing::debug!(%url, attempt = i, error = %e, "ws connect attempt failed");
            }
        }
    }
    tracing::warn!(%url, "ws connect: failed after 10 attempts");
    None
}

/// Raw frame shape on the status channel.
#[derive(Deserialize)]
struct StatusFrame {
    #[serde(rename = "eventType")]
    event_type: Option<String>,
    #[serde(rename = "workspaceId")]
    workspace_id: Option<WorkspaceId>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one WebSocket frame into a [`StatusEvent`].
///
/// Frames arrive on a per-workspace endpoint, so a missing `workspaceId`
/// falls back to the subscribed id. Frames without an `eventType` (pings,
/// acks) produce nothing.
fn parse_status_frame(text: &str, subscribed: &WorkspaceId) -> Option<StatusEvent> {
    let frame: StatusFrame = serde_json::from_str(text).ok()?;
    let event_type = frame.event_type?;
    Some(StatusEvent {
        workspace_id: frame.workspace_id.unwrap_or_else(|| subscribed.clone()),
        event_type,
        error: frame.error,
    })
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{EventFeed, FeedError, Subscription};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::{mpsc, oneshot};
    use wsc_core::{StatusEvent, WorkspaceId};

    #[derive(Default)]
    struct FakeFeedState {
        senders: HashMap<WorkspaceId, mpsc::Sender<StatusEvent>>,
        subscribed: Vec<WorkspaceId>,
    }

    /// Fake event feed with hand-fired events for testing.
    #[derive(Clone, Default)]
    pub struct FakeEventFeed {
        inner: Arc<Mutex<FakeFeedState>>,
    }

    impl FakeEventFeed {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every workspace id a subscription was opened for, in order.
        pub fn subscriptions(&self) -> Vec<WorkspaceId> {
            self.inner.lock().subscribed.clone()
        }

        /// Fire a status event into the subscription for `id`. Returns false
        /// when no subscription exists or the receiver is gone.
        pub async fn fire(&self, id: &str, event_type: &str) -> bool {
            self.fire_event(StatusEvent::new(id, event_type)).await
        }

        pub async fn fire_event(&self, event: StatusEvent) -> bool {
            let sender = self.inner.lock().senders.get(&event.workspace_id).cloned();
            match sender {
                Some(tx) => tx.send(event).await.is_ok(),
                None => false,
            }
        }
    }

    impl EventFeed for FakeEventFeed {
        fn subscribe(
            &self,
            workspace_id: &WorkspaceId,
            events: mpsc::Sender<StatusEvent>,
        ) -> Result<Subscription, FeedError> {
            let mut state = self.inner.lock();
            state.subscribed.push(workspace_id.clone());
            state.senders.insert(workspace_id.clone(), events);
            let (shutdown_tx, _shutdown_rx) = oneshot::channel();
            Ok(Subscription::new(shutdown_tx))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEventFeed;

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
