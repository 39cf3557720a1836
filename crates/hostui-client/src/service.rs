//! Best-effort adapter between the conversation service and the view-state.
//!
//! Every operation here swallows backend failures: the error is logged with
//! `tracing` and an empty or default value is returned, so a flaky backend
//! degrades the UI instead of breaking it. Nothing is retried; the next
//! refresh (timer, push event or user action) simply tries again.

use std::sync::Arc;

use async_trait::async_trait;

use hostui_protocol::*;
use hostui_state::convert::{
    convert_conversation_to_state, convert_event_to_state, convert_message_to_state,
    convert_task_to_state, extract_conversation_id,
};
use hostui_state::{AppStateStore, SessionTask};

use crate::client::{fetch_agent_card, ConversationClient};
use crate::error::Result;
use crate::http::HttpClientHandle;

/// Raw request/response contract of the conversation service.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    async fn list_conversations(&self) -> Result<Option<Vec<Conversation>>>;
    async fn create_conversation(&self) -> Result<Option<Conversation>>;
    async fn send_message(&self, message: &Message) -> Result<Option<SendMessageResult>>;
    async fn list_messages(&self, conversation_id: &str) -> Result<Option<Vec<Message>>>;
    async fn pending_messages(&self) -> Result<Option<PendingMessages>>;
    async fn events(&self) -> Result<Option<Vec<Event>>>;
    async fn tasks(&self) -> Result<Option<Vec<Task>>>;
    async fn register_agent(&self, address: &str) -> Result<()>;
    async fn list_agents(&self) -> Result<Option<Vec<AgentCard>>>;
    async fn update_api_key(&self, api_key: &str) -> Result<()>;
    async fn agent_card(&self, address: &str) -> Result<AgentCard>;
}

/// Backend reached over HTTP. A fresh [`ConversationClient`] is built for
/// each call on top of the shared HTTP client.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    server_url: String,
    http: HttpClientHandle,
}

impl RemoteBackend {
    pub fn new(server_url: impl Into<String>, http: HttpClientHandle) -> Self {
        Self {
            server_url: server_url.into(),
            http,
        }
    }

    fn client(&self) -> Result<ConversationClient> {
        Ok(ConversationClient::new(self.server_url.clone(), self.http.get()?))
    }
}

#[async_trait]
impl ConversationBackend for RemoteBackend {
    async fn list_conversations(&self) -> Result<Option<Vec<Conversation>>> {
        self.client()?.list_conversation().await
    }

    async fn create_conversation(&self) -> Result<Option<Conversation>> {
        self.client()?.create_conversation().await
    }

    async fn send_message(&self, message: &Message) -> Result<Option<SendMessageResult>> {
        self.client()?.send_message(message).await
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Option<Vec<Message>>> {
        self.client()?.list_messages(conversation_id).await
    }

    async fn pending_messages(&self) -> Result<Option<PendingMessages>> {
        self.client()?.get_pending_messages().await
    }

    async fn events(&self) -> Result<Option<Vec<Event>>> {
        self.client()?.get_events().await
    }

    async fn tasks(&self) -> Result<Option<Vec<Task>>> {
        self.client()?.list_tasks().await
    }

    async fn register_agent(&self, address: &str) -> Result<()> {
        self.client()?.register_agent(address).await.map(|_| ())
    }

    async fn list_agents(&self) -> Result<Option<Vec<AgentCard>>> {
        self.client()?.list_agents().await
    }

    async fn update_api_key(&self, api_key: &str) -> Result<()> {
        self.client()?.update_api_key(api_key).await
    }

    async fn agent_card(&self, address: &str) -> Result<AgentCard> {
        fetch_agent_card(&self.http.get()?, address).await
    }
}

/// UI-facing service. Cheap to clone.
#[derive(Clone)]
pub struct HostAgentService {
    backend: Arc<dyn ConversationBackend>,
}

impl HostAgentService {
    pub fn new(backend: Arc<dyn ConversationBackend>) -> Self {
        Self { backend }
    }

    pub fn remote(server_url: impl Into<String>, http: HttpClientHandle) -> Self {
        Self::new(Arc::new(RemoteBackend::new(server_url, http)))
    }

    pub async fn list_conversations(&self) -> Vec<Conversation> {
        match self.backend.list_conversations().await {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list conversations");
                Vec::new()
            }
        }
    }

    pub async fn send_message(&self, message: &Message) -> Option<SendMessageResult> {
        match self.backend.send_message(message).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    message_id = %message.message_id,
                    "Failed to send message"
                );
                None
            }
        }
    }

    /// A new conversation, or an inactive stand-in with an empty id.
    pub async fn create_conversation(&self) -> Conversation {
        match self.backend.create_conversation().await {
            Ok(conv) => conv.unwrap_or_else(Conversation::inactive),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create conversation");
                Conversation::inactive()
            }
        }
    }

    pub async fn list_remote_agents(&self) -> Vec<AgentCard> {
        match self.backend.list_agents().await {
            Ok(agents) => agents.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read agents");
                Vec::new()
            }
        }
    }

    pub async fn add_remote_agent(&self, path: &str) {
        if let Err(e) = self.backend.register_agent(path).await {
            tracing::warn!(error = %e, address = %path, "Failed to register the agent");
        }
    }

    pub async fn get_events(&self) -> Vec<Event> {
        match self.backend.events().await {
            Ok(events) => events.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get events");
                Vec::new()
            }
        }
    }

    pub async fn get_processing_messages(&self) -> PendingMessages {
        match self.backend.pending_messages().await {
            Ok(pending) => pending.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Error getting pending messages");
                PendingMessages::new()
            }
        }
    }

    /// Message aliases are not tracked by the service; always empty.
    pub fn get_message_aliases(&self) -> PendingMessages {
        PendingMessages::new()
    }

    pub async fn get_tasks(&self) -> Vec<Task> {
        match self.backend.tasks().await {
            Ok(tasks) => tasks.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list tasks");
                Vec::new()
            }
        }
    }

    pub async fn list_messages(&self, conversation_id: &str) -> Vec<Message> {
        match self.backend.list_messages(conversation_id).await {
            Ok(messages) => messages.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, conversation_id, "Failed to list messages");
                Vec::new()
            }
        }
    }

    /// Returns whether the service accepted the key.
    pub async fn update_api_key(&self, api_key: &str) -> bool {
        match self.backend.update_api_key(api_key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update API key");
                false
            }
        }
    }

    pub async fn fetch_agent_card(&self, address: &str) -> Result<AgentCard> {
        self.backend.agent_card(address).await
    }

    /// Refresh the snapshot from the backend.
    ///
    /// With a conversation id, that conversation becomes current and its
    /// messages are fetched first. Conversations, tasks and pending messages
    /// are then fetched concurrently and written back together. Each fetch
    /// falls back to an empty result on failure, so a partial outage leaves
    /// the other lists updated. Never fails.
    pub async fn update_app_state(&self, store: &AppStateStore, conversation_id: Option<&str>) {
        if let Some(conversation_id) = conversation_id.filter(|c| !c.is_empty()) {
            store.write().await.current_conversation_id = conversation_id.to_string();
            self.refresh_messages(store, conversation_id).await;
        }
        self.refresh_lists(store).await;
    }

    /// Timer-driven refresh that follows the current selection without
    /// ever changing it.
    pub async fn refresh_selected(&self, store: &AppStateStore) {
        let selected = store.read().await.current_conversation_id.clone();
        if !selected.is_empty() {
            self.refresh_messages(store, &selected).await;
        }
        self.refresh_lists(store).await;
    }

    /// Messages are only written while `conversation_id` is still selected.
    async fn refresh_messages(&self, store: &AppStateStore, conversation_id: &str) {
        let messages = self.list_messages(conversation_id).await;
        let converted: Vec<_> = messages.iter().map(convert_message_to_state).collect();

        let mut state = store.write().await;
        if state.current_conversation_id != conversation_id {
            tracing::debug!(
                conversation_id,
                selected = %state.current_conversation_id,
                "Selection changed during refresh, dropping messages"
            );
            return;
        }
        state.messages = converted;
    }

    async fn refresh_lists(&self, store: &AppStateStore) {
        let (conversations, tasks, background) = tokio::join!(
            self.list_conversations(),
            self.get_tasks(),
            self.get_processing_messages(),
        );

        let conversations: Vec<_> = conversations
            .iter()
            .map(convert_conversation_to_state)
            .collect();
        let task_list: Vec<_> = tasks
            .iter()
            .map(|task| SessionTask {
                context_id: extract_conversation_id(task),
                task: convert_task_to_state(task),
            })
            .collect();

        let mut state = store.write().await;
        tracing::debug!(
            conversations = conversations.len(),
            tasks = task_list.len(),
            pending = background.len(),
            "App state refreshed"
        );
        state.conversations = conversations;
        state.task_list = task_list;
        state.background_tasks = background;
        state.message_aliases = self.get_message_aliases();
    }

    /// Refresh the audit trail shown on the events page.
    pub async fn update_events(&self, store: &AppStateStore) {
        let events = self.get_events().await;
        store.write().await.events = events.iter().map(convert_event_to_state).collect();
    }

    /// Load the remote agent list into the agents page state.
    pub async fn load_agents(&self, store: &AppStateStore) {
        let agents = self.list_remote_agents().await;
        store.agents_mut().await.set_agents(agents);
    }
}

impl std::fmt::Debug for HostAgentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostAgentService").finish_non_exhaustive()
    }
}
