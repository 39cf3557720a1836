//! HTTP server for page routes, UI actions, web component assets and the
//! push channel.

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::services::{ServeDir, ServeFile};

use hostui_client::HostAgentService;
use hostui_protocol::{Message, PUSH_CHANNEL_PATH};
use hostui_state::convert::convert_message_to_state;
use hostui_state::AppStateStore;

use crate::pages::{on_load, Credentials, PageKind, PageQuery, PageSpec, PageView, PAGES};
use crate::push;

#[derive(Clone)]
pub struct WebState {
    pub store: AppStateStore,
    pub service: HostAgentService,
    pub credentials: Credentials,
    pub push_interval: Duration,
}

pub struct FileServer {
    bind_addr: String,
    web: WebState,
    web_root: PathBuf,
}

impl FileServer {
    pub fn new(bind_addr: String, web: WebState, web_root: PathBuf) -> Self {
        Self {
            bind_addr,
            web,
            web_root,
        }
    }

    pub fn router(&self) -> Router {
        router(self.web.clone(), self.web_root.clone())
    }

    pub async fn run(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), anyhow::Error> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(
            addr = %self.bind_addr,
            web_root = %self.web_root.display(),
            "Host UI listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

pub fn router(web: WebState, web_root: PathBuf) -> Router {
    let index_file = web_root.join("index.html");
    let static_service = ServeDir::new(&web_root).not_found_service(ServeFile::new(index_file));

    let mut app = Router::new()
        .route(PUSH_CHANNEL_PATH, get(push_channel))
        .route("/api/health", get(api_health))
        .route("/actions/refresh", post(action_refresh))
        .route("/actions/conversation", post(action_create_conversation))
        .route("/actions/message", post(action_send_message))
        .route("/actions/agents", post(action_add_agent))
        .route("/actions/api_key", post(action_update_api_key));

    for page in PAGES {
        app = app.route(
            page.path,
            get(move |State(web): State<WebState>, Query(query): Query<PageQuery>| {
                render_page(web, page, query)
            }),
        );
    }

    app.fallback_service(static_service).with_state(web)
}

async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "hostui"}))
}

async fn push_channel(ws: WebSocketUpgrade, State(web): State<WebState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| push::stream_loop(socket, web.store, web.push_interval))
}

async fn render_page(web: WebState, page: &'static PageSpec, query: PageQuery) -> Json<PageView> {
    let conversation_id = {
        let mut s = web.store.write().await;
        on_load(&mut s, &query, &web.credentials);
        s.enable_polling = page.enable_polling;
        s.current_conversation_id.clone()
    };

    match page.kind {
        PageKind::Agents => web.service.load_agents(&web.store).await,
        PageKind::EventList => {
            web.service.update_app_state(&web.store, None).await;
            web.service.update_events(&web.store).await;
        }
        _ => {
            web.service
                .update_app_state(&web.store, Some(conversation_id.as_str()))
                .await
        }
    }

    let agents = match page.kind {
        PageKind::Agents => Some(web.store.agents().await.clone()),
        _ => None,
    };
    Json(PageView {
        page: *page,
        state: web.store.snapshot().await,
        agents,
    })
}

async fn action_refresh(
    State(web): State<WebState>,
    Query(query): Query<PageQuery>,
) -> Json<serde_json::Value> {
    web.service
        .update_app_state(&web.store, query.conversation_id.as_deref())
        .await;
    Json(serde_json::json!({"ok": true}))
}

async fn action_create_conversation(State(web): State<WebState>) -> impl IntoResponse {
    let conversation = web.service.create_conversation().await;
    if conversation.conversation_id.is_empty() {
        return (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"ok": false, "error": "conversation_not_created"})),
        );
    }
    web.service
        .update_app_state(&web.store, Some(conversation.conversation_id.as_str()))
        .await;
    (
        StatusCode::OK,
        Json(serde_json::json!({"ok": true, "conversation": conversation})),
    )
}

#[derive(Deserialize)]
struct SendMessageRequest {
    conversation_id: String,
    text: String,
}

async fn action_send_message(
    State(web): State<WebState>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"ok": false, "error": "missing_text"})),
        );
    }

    let conversation_id = Some(req.conversation_id.clone()).filter(|c| !c.is_empty());
    let message = Message::user_text(conversation_id, req.text);
    {
        let mut s = web.store.write().await;
        if s.current_conversation_id == req.conversation_id {
            s.messages.push(convert_message_to_state(&message));
        }
    }

    let Some(result) = web.service.send_message(&message).await else {
        return (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"ok": false, "error": "send_failed"})),
        );
    };
    web.service
        .update_app_state(&web.store, Some(req.conversation_id.as_str()))
        .await;
    (
        StatusCode::OK,
        Json(serde_json::json!({"ok": true, "message_id": result.message_id()})),
    )
}

#[derive(Deserialize)]
struct AddAgentRequest {
    address: String,
}

async fn action_add_agent(
    State(web): State<WebState>,
    Json(req): Json<AddAgentRequest>,
) -> impl IntoResponse {
    let address = req.address.trim().to_string();
    if address.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"ok": false, "error": "missing_address"})),
        );
    }

    web.store.agents_mut().await.open_dialog();
    let card = match web.service.fetch_agent_card(&address).await {
        Ok(card) => card,
        Err(e) => {
            tracing::warn!(error = %e, %address, "Failed to read agent card");
            let mut agents = web.store.agents_mut().await;
            agents.set_error(&address, format!("Cannot connect to agent at {address}"));
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"ok": false, "agents": agents.clone()})),
            );
        }
    };
    web.store.agents_mut().await.apply_card(&address, &card);

    web.service.add_remote_agent(&address).await;
    web.store.agents_mut().await.close_dialog();
    web.service.load_agents(&web.store).await;

    let agents = web.store.agents().await.clone();
    (
        StatusCode::OK,
        Json(serde_json::json!({"ok": true, "card": card, "agents": agents})),
    )
}

#[derive(Deserialize)]
struct ApiKeyRequest {
    api_key: String,
}

async fn action_update_api_key(
    State(web): State<WebState>,
    Json(req): Json<ApiKeyRequest>,
) -> impl IntoResponse {
    if req.api_key.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"ok": false, "error": "missing_api_key"})),
        );
    }
    if !web.service.update_api_key(&req.api_key).await {
        return (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"ok": false, "error": "api_key_rejected"})),
        );
    }
    let mut s = web.store.write().await;
    s.api_key = req.api_key;
    s.api_key_dialog_open = false;
    (StatusCode::OK, Json(serde_json::json!({"ok": true})))
}
