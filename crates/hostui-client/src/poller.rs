//! Client side of the push-update channel.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message as WsMessage;

use hostui_protocol::{PushEnvelope, PUSH_CHANNEL_PATH, STATE_UPDATE_TYPE};
use hostui_state::AppState;

use crate::error::Result;

/// Outbound payload relayed to the server once connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSocketAction {
    pub value: AppState,
}

/// Receives server-pushed snapshots instead of polling on a timer.
#[derive(Debug, Clone)]
pub struct WebSocketPoller {
    url: String,
}

impl WebSocketPoller {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Channel URL for a host reachable at `http_base`.
    pub fn for_host(http_base: &str) -> Self {
        let base = http_base.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        Self::new(format!("{ws_base}{PUSH_CHANNEL_PATH}"))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run until the server closes the channel.
    ///
    /// `trigger_event` is invoked once per `state_update` frame, in the order
    /// the server sent them. Frames of any other type, or that fail to
    /// decode, are skipped. Returns the number of snapshots delivered.
    pub async fn run<F>(&self, action: Option<WebSocketAction>, mut trigger_event: F) -> Result<usize>
    where
        F: FnMut(AppState),
    {
        let (mut socket, _) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        tracing::debug!(url = %self.url, "push channel connected");

        if let Some(action) = action {
            let frame = serde_json::to_string(&PushEnvelope::action(action))?;
            socket.send(WsMessage::Text(frame)).await?;
        }

        let mut delivered = 0;
        while let Some(frame) = socket.next().await {
            let text = match frame {
                Ok(WsMessage::Text(text)) => text,
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "push channel closed");
                    break;
                }
            };
            match decode_state_update(&text) {
                Some(state) => {
                    delivered += 1;
                    trigger_event(state);
                }
                None => tracing::trace!("ignoring push frame"),
            }
        }
        Ok(delivered)
    }
}

fn decode_state_update(text: &str) -> Option<AppState> {
    let envelope: PushEnvelope<serde_json::Value> = serde_json::from_str(text).ok()?;
    if envelope.kind != STATE_UPDATE_TYPE {
        return None;
    }
    serde_json::from_value(envelope.data).ok()
}
