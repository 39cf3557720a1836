//! Server side of the push-update channel, plus the timer that keeps the
//! snapshot fresh while a polling page is open.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use tokio::time::MissedTickBehavior;

use hostui_client::{HostAgentService, WebSocketAction};
use hostui_protocol::{PushEnvelope, ACTION_TYPE};
use hostui_state::AppStateStore;

/// Push the current snapshot every `period` until the client goes away.
///
/// Each connection runs this on its own task. A failed send or encode ends
/// the loop and closes the socket; the host keeps serving.
pub async fn stream_loop(mut socket: WebSocket, store: AppStateStore, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let payload = {
                    let s = store.read().await;
                    serde_json::to_string(&PushEnvelope::state_update(&*s))
                };
                let payload = match payload {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = %e, "WebSocket error: snapshot encode failed");
                        break;
                    }
                };
                if let Err(e) = socket.send(Message::Text(payload)).await {
                    tracing::debug!(error = %e, "WebSocket send failed");
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => relay_action(&text),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "WebSocket receive failed");
                        break;
                    }
                }
            }
        }
    }
    let _ = socket.close().await;
    tracing::debug!("push channel closed");
}

/// Client actions are only logged; the store is written by the adapter.
fn relay_action(text: &str) {
    match serde_json::from_str::<PushEnvelope<WebSocketAction>>(text) {
        Ok(envelope) if envelope.kind == ACTION_TYPE => {
            tracing::debug!(
                conversation_id = %envelope.data.value.current_conversation_id,
                "received client action"
            );
        }
        Ok(envelope) => tracing::trace!(kind = %envelope.kind, "ignoring client frame"),
        Err(e) => tracing::trace!(error = %e, "ignoring malformed client frame"),
    }
}

/// Refresh the snapshot from the backend while the shown page wants polling.
pub async fn refresh_loop(service: HostAgentService, store: AppStateStore, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let enabled = store.read().await.enable_polling;
        if enabled {
            service.refresh_selected(&store).await;
        }
    }
}
