use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Displayable payload of one content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentPayload {
    Text(String),
    /// Base64 encoded file contents
    FileInline(String),
    FileRef(String),
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl ContentPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPayload::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A payload paired with its media type.
pub type ContentPart = (ContentPayload, String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateMessage {
    pub message_id: String,
    pub context_id: String,
    pub task_id: String,
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateConversation {
    pub conversation_id: String,
    pub conversation_name: String,
    pub is_active: bool,
    pub message_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateTask {
    pub task_id: String,
    pub context_id: String,
    pub state: String,
    pub message: StateMessage,
    pub artifacts: Vec<Vec<ContentPart>>,
}

/// A task keyed by the conversation it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionTask {
    pub context_id: String,
    pub task: StateTask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateEvent {
    pub context_id: String,
    pub actor: String,
    pub role: String,
    pub id: String,
    pub content: Vec<ContentPart>,
}

/// Process-wide view-state snapshot read by pages and the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub sidenav_open: bool,
    pub theme_mode: String,

    pub current_conversation_id: String,
    pub conversations: Vec<StateConversation>,
    pub messages: Vec<StateMessage>,
    pub task_list: Vec<SessionTask>,
    /// Pending message id → status
    pub background_tasks: BTreeMap<String, String>,
    pub message_aliases: BTreeMap<String, String>,
    pub events: Vec<StateEvent>,

    pub polling_interval: u64,
    pub enable_polling: bool,

    pub api_key: String,
    pub uses_vertex_ai: bool,
    pub api_key_dialog_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sidenav_open: false,
            theme_mode: "system".to_string(),
            current_conversation_id: String::new(),
            conversations: Vec::new(),
            messages: Vec::new(),
            task_list: Vec::new(),
            background_tasks: BTreeMap::new(),
            message_aliases: BTreeMap::new(),
            events: Vec::new(),
            polling_interval: 1,
            enable_polling: false,
            api_key: String::new(),
            uses_vertex_ai: false,
            api_key_dialog_open: false,
        }
    }
}
