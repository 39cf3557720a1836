use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use hostui_client::{WebSocketAction, WebSocketPoller};
use hostui_protocol::PushEnvelope;
use hostui_state::AppState;

async fn scripted(ws: WebSocketUpgrade, seen: Arc<Mutex<Vec<String>>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| push_two(socket, seen))
}

async fn push_two(mut socket: WebSocket, seen: Arc<Mutex<Vec<String>>>) {
    if let Some(Ok(Message::Text(action))) = socket.recv().await {
        seen.lock().unwrap().push(action);
    }
    for id in ["first", "second"] {
        let state = AppState {
            current_conversation_id: id.to_string(),
            ..Default::default()
        };
        let frame = serde_json::to_string(&PushEnvelope::state_update(state)).unwrap();
        socket.send(Message::Text(frame)).await.unwrap();
    }
    socket
        .send(Message::Text(r#"{"type":"heartbeat","data":null}"#.to_string()))
        .await
        .unwrap();
    let _ = socket.close().await;
}

#[tokio::test]
async fn test_poller_delivers_snapshots_in_order_and_relays_action() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = seen.clone();
    let app = Router::new().route(
        "/__ws__",
        get(move |ws: WebSocketUpgrade| scripted(ws, seen_srv.clone())),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let poller = WebSocketPoller::for_host(&format!("http://{addr}"));
    let mut received = Vec::new();
    let action = WebSocketAction {
        value: AppState::default(),
    };
    let delivered = poller
        .run(Some(action), |state| received.push(state.current_conversation_id))
        .await
        .unwrap();

    assert_eq!(delivered, 2);
    assert_eq!(received, vec!["first", "second"]);
    let relayed = seen.lock().unwrap();
    assert_eq!(relayed.len(), 1);
    let envelope: serde_json::Value = serde_json::from_str(&relayed[0]).unwrap();
    assert_eq!(envelope["type"], "action");
    assert!(envelope["data"]["value"].is_object());
}
