//! End-to-end tests of the host against a mock conversation service.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hostui_client::{HostAgentService, HttpClientHandle};
use hostui_server::file_server::{router, WebState};
use hostui_server::pages::Credentials;
use hostui_server::HostConfig;
use hostui_state::AppStateStore;

fn rpc_ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": result
    }))
}

async fn mock_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversation/list"))
        .respond_with(rpc_ok(serde_json::json!([{
            "conversation_id": "conv-1",
            "is_active": true,
            "name": "demo",
            "messages": [{ "messageId": "m1", "role": "user", "parts": [] }]
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/list"))
        .respond_with(rpc_ok(serde_json::json!([{
            "messageId": "m1",
            "contextId": "conv-1",
            "role": "user",
            "parts": [{ "kind": "text", "text": "hello" }]
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/task/list"))
        .respond_with(rpc_ok(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/pending"))
        .respond_with(rpc_ok(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/agent/list"))
        .respond_with(rpc_ok(serde_json::json!([])))
        .mount(&server)
        .await;
    server
}

async fn spawn_host(backend_url: String) -> (String, AppStateStore) {
    let http = HttpClientHandle::new();
    http.start().unwrap();
    let store = AppStateStore::default();
    let web = WebState {
        store: store.clone(),
        service: HostAgentService::remote(backend_url, http),
        credentials: Credentials {
            api_key: Some("test-key".into()),
            uses_vertex_ai: false,
        },
        push_interval: Duration::from_millis(20),
    };
    let web_root = std::env::temp_dir();
    let app = router(web, web_root);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

#[tokio::test]
async fn test_conversation_page_primes_state_from_query() {
    let backend = mock_backend().await;
    let (base, store) = spawn_host(backend.uri()).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/conversation?conversation_id=conv-1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["page"]["title"], "Conversation");
    assert_eq!(body["state"]["current_conversation_id"], "conv-1");
    assert_eq!(body["state"]["enable_polling"], true);
    assert_eq!(body["state"]["api_key"], "test-key");
    assert_eq!(body["state"]["messages"][0]["message_id"], "m1");
    assert_eq!(body["state"]["conversations"][0]["message_ids"][0], "m1");

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.conversations.len(), 1);
}

#[tokio::test]
async fn test_agents_page_disables_polling_and_clears_selection() {
    let backend = mock_backend().await;
    let (base, store) = spawn_host(backend.uri()).await;
    store.write().await.current_conversation_id = "conv-1".into();

    let body: serde_json::Value = reqwest::get(format!("{base}/agents"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["state"]["enable_polling"], false);
    assert_eq!(body["state"]["current_conversation_id"], "");
    assert_eq!(body["agents"]["agents_loaded"], true);
}

#[tokio::test]
async fn test_push_channel_sends_state_updates() {
    let backend = mock_backend().await;
    let (base, store) = spawn_host(backend.uri()).await;
    store.write().await.current_conversation_id = "pushed".into();

    let ws_url = format!("{}/__ws__", base.replacen("http://", "ws://", 1));
    let (mut socket, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await.unwrap();

    for _ in 0..2 {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let text = frame.into_text().unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["type"], "state_update");
        assert_eq!(v["data"]["current_conversation_id"], "pushed");
    }
}

#[tokio::test]
async fn test_push_channel_keeps_streaming_after_client_frames() {
    let backend = mock_backend().await;
    let (base, store) = spawn_host(backend.uri()).await;

    let ws_url = format!("{}/__ws__", base.replacen("http://", "ws://", 1));
    let (mut socket, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await.unwrap();

    let action = serde_json::json!({ "type": "action", "data": { "value": {} } });
    socket.send(WsMessage::Text(action.to_string())).await.unwrap();
    socket.send(WsMessage::Text("not json".to_string())).await.unwrap();
    store.write().await.current_conversation_id = "after-action".into();

    let mut seen = false;
    for _ in 0..5 {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&frame.into_text().unwrap()).unwrap();
        if v["data"]["current_conversation_id"] == "after-action" {
            seen = true;
            break;
        }
    }
    assert!(seen, "client frames must not end the stream");
    assert_eq!(
        store.snapshot().await.current_conversation_id,
        "after-action",
        "client actions do not write the store"
    );

    let _ = socket.close(None).await;
}

#[tokio::test]
async fn test_send_message_failure_is_reported_not_raised() {
    let backend = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/message/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;
    let (base, _) = spawn_host(backend.uri()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/actions/message"))
        .json(&serde_json::json!({ "conversation_id": "conv-1", "text": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "send_failed");
}

#[tokio::test]
async fn test_health() {
    let backend = mock_backend().await;
    let (base, _) = spawn_host(backend.uri()).await;
    let body: serde_json::Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hostui.toml");
    std::fs::write(
        &path,
        "port = 12100\nserver_url = \"http://backend:9000\"\npush_interval_ms = 250\n",
    )
    .unwrap();

    let config = HostConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.port, 12100);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.server_url(), "http://backend:9000");
    assert_eq!(config.push_interval_ms, 250);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(HostConfig::load(Some(dir.path().join("absent.toml").as_path())).is_err());
}
