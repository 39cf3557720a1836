use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Accepted by the agent but not yet started
    Submitted,
    /// Agent is producing output
    Working,
    /// Agent is waiting on the user
    InputRequired,
    /// Finished successfully
    Completed,
    /// Canceled by the user
    Canceled,
    /// Finished with an error
    Failed,
    /// Agent refused the task
    Rejected,
    /// Agent is waiting on credentials
    AuthRequired,
    #[default]
    Unknown,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Working => "working",
            Self::InputRequired => "input-required",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
            Self::AuthRequired => "auth-required",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline file payload; `bytes` is base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithBytes {
    pub bytes: String,
    #[serde(default, alias = "mime_type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// File payload referenced by URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithUri {
    pub uri: String,
    #[serde(default, alias = "mime_type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Bytes(FileWithBytes),
    Uri(FileWithUri),
}

impl FileContent {
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            FileContent::Bytes(f) => f.mime_type.as_deref(),
            FileContent::Uri(f) => f.mime_type.as_deref(),
        }
    }
}

/// One piece of message or artifact content, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    File {
        file: FileContent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    Data {
        data: serde_json::Map<String, serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn data(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Part::Data {
            data,
            metadata: None,
        }
    }
}

/// A message exchanged between the user and an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "message_id")]
    pub message_id: String,
    #[serde(default, alias = "context_id", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, alias = "task_id", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    /// A fresh user message with a single text part.
    pub fn user_text(context_id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            context_id,
            task_id: None,
            role: Role::User,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Output produced by a task, independent of the message that started it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default, alias = "artifact_id")]
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A unit of work performed by a remote agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, alias = "context_id", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// A thread of messages grouped by a shared context id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub is_active: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Stand-in returned when a conversation could not be created.
    pub fn inactive() -> Self {
        Self {
            conversation_id: String::new(),
            is_active: false,
            name: String::new(),
            task_ids: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// Audit record of an action taken within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub actor: String,
    pub content: Message,
    #[serde(default)]
    pub timestamp: f64,
}

/// Acknowledgement returned when the service queues a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub message_id: String,
    pub context_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendMessageResult {
    Message(Message),
    Info(MessageInfo),
}

impl SendMessageResult {
    pub fn message_id(&self) -> &str {
        match self {
            SendMessageResult::Message(m) => &m.message_id,
            SendMessageResult::Info(i) => &i.message_id,
        }
    }
}

/// Pending message id to its processing status.
pub type PendingMessages = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: Option<bool>,
    #[serde(default, alias = "push_notifications")]
    pub push_notifications: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Self-description a remote agent publishes at its well-known path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default, alias = "default_input_modes")]
    pub default_input_modes: Vec<String>,
    #[serde(default, alias = "default_output_modes")]
    pub default_output_modes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_uses_kebab_case_on_the_wire() {
        let s: TaskState = serde_json::from_str("\"input-required\"").unwrap();
        assert_eq!(s, TaskState::InputRequired);
        assert_eq!(s.to_string(), "input-required");
        assert_eq!(serde_json::to_string(&TaskState::AuthRequired).unwrap(), "\"auth-required\"");
    }

    #[test]
    fn file_part_prefers_bytes_variant() {
        let part: Part = serde_json::from_value(serde_json::json!({
            "kind": "file",
            "file": { "bytes": "aGVsbG8=", "mimeType": "image/png" }
        }))
        .unwrap();
        match part {
            Part::File { file: FileContent::Bytes(f), .. } => {
                assert_eq!(f.bytes, "aGVsbG8=");
                assert_eq!(f.mime_type.as_deref(), Some("image/png"));
            }
            other => panic!("unexpected part: {other:?}"),
        }
    }

    #[test]
    fn send_result_falls_back_to_message_info() {
        let r: SendMessageResult = serde_json::from_value(serde_json::json!({
            "message_id": "m1",
            "context_id": "c1"
        }))
        .unwrap();
        assert!(matches!(r, SendMessageResult::Info(_)));
        assert_eq!(r.message_id(), "m1");
    }
}
