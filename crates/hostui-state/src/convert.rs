//! Pure conversions from wire DTOs to view-state.
//!
//! None of these functions touch the network or the shared store, and none
//! of them fail: content that cannot be rendered degrades to a placeholder.

use hostui_protocol::{
    Conversation, Event, FileContent, Message, Part, Role, Task, TaskState, NO_HISTORY_TEXT,
};

use crate::app_state::{
    ContentPart, ContentPayload, StateConversation, StateEvent, StateMessage, StateTask,
};

pub const MEDIA_TEXT: &str = "text/plain";
pub const MEDIA_JSON: &str = "application/json";
pub const MEDIA_FORM: &str = "form";
const DATA_PLACEHOLDER: &str = "<data>";

pub fn convert_message_to_state(message: &Message) -> StateMessage {
    StateMessage {
        message_id: message.message_id.clone(),
        context_id: message.context_id.clone().unwrap_or_default(),
        task_id: message.task_id.clone().unwrap_or_default(),
        role: message.role.name().to_string(),
        content: extract_content(&message.parts),
    }
}

pub fn convert_conversation_to_state(conversation: &Conversation) -> StateConversation {
    StateConversation {
        conversation_id: conversation.conversation_id.clone(),
        conversation_name: conversation.name.clone(),
        is_active: conversation.is_active,
        message_ids: conversation.messages.iter().map(extract_message_id).collect(),
    }
}

/// Converts a task for display.
///
/// The first history entry describes the task. When the latest entry is a
/// different message, its content is surfaced ahead of the declared
/// artifacts. A task without history is shown as failed.
pub fn convert_task_to_state(task: &Task) -> StateTask {
    let mut artifacts: Vec<Vec<ContentPart>> = task
        .artifacts
        .iter()
        .map(|a| extract_content(&a.parts))
        .collect();
    let context_id = task.context_id.clone().unwrap_or_default();

    let (Some(first), Some(last)) = (task.history.first(), task.history.last()) else {
        return StateTask {
            task_id: task.id.clone(),
            context_id: context_id.clone(),
            state: TaskState::Failed.as_str().to_string(),
            message: StateMessage {
                message_id: uuid::Uuid::new_v4().to_string(),
                context_id,
                task_id: task.id.clone(),
                role: Role::Agent.name().to_string(),
                content: vec![(
                    ContentPayload::Text(NO_HISTORY_TEXT.to_string()),
                    "text".to_string(),
                )],
            },
            artifacts,
        };
    };

    if last != first {
        artifacts.insert(0, extract_content(&last.parts));
    }

    StateTask {
        task_id: task.id.clone(),
        context_id,
        state: task.status.state.as_str().to_string(),
        message: convert_message_to_state(first),
        artifacts,
    }
}

pub fn convert_event_to_state(event: &Event) -> StateEvent {
    StateEvent {
        context_id: extract_message_conversation(&event.content),
        actor: event.actor.clone(),
        role: event.content.role.name().to_string(),
        id: event.id.clone(),
        content: extract_content(&event.content.parts),
    }
}

pub fn extract_content(parts: &[Part]) -> Vec<ContentPart> {
    parts.iter().map(extract_part).collect()
}

fn extract_part(part: &Part) -> ContentPart {
    match part {
        Part::Text { text, .. } => (ContentPayload::Text(text.clone()), MEDIA_TEXT.to_string()),
        Part::File { file, .. } => {
            let mime = file.mime_type().unwrap_or_default().to_string();
            match file {
                FileContent::Bytes(f) => (ContentPayload::FileInline(f.bytes.clone()), mime),
                FileContent::Uri(f) => (ContentPayload::FileRef(f.uri.clone()), mime),
            }
        }
        Part::Data { data, .. } => {
            if data.get("type").and_then(|t| t.as_str()) == Some("form") {
                return (ContentPayload::Structured(data.clone()), MEDIA_FORM.to_string());
            }
            match serde_json::to_string(data) {
                Ok(json) => (ContentPayload::Text(json), MEDIA_JSON.to_string()),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize data part");
                    (
                        ContentPayload::Text(DATA_PLACEHOLDER.to_string()),
                        MEDIA_TEXT.to_string(),
                    )
                }
            }
        }
    }
}

pub fn extract_message_id(message: &Message) -> String {
    message.message_id.clone()
}

pub fn extract_message_conversation(message: &Message) -> String {
    message.context_id.clone().unwrap_or_default()
}

/// Conversation a task belongs to: its own context id, else the context id
/// of its status message, else empty.
pub fn extract_conversation_id(task: &Task) -> String {
    if let Some(ctx) = task.context_id.as_deref().filter(|c| !c.is_empty()) {
        return ctx.to_string();
    }
    task.status
        .message
        .as_ref()
        .and_then(|m| m.context_id.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostui_protocol::{FileWithBytes, FileWithUri, TaskStatus};

    fn msg(id: &str, text: &str) -> Message {
        Message {
            message_id: id.into(),
            context_id: Some("c1".into()),
            task_id: None,
            role: Role::Agent,
            parts: vec![Part::text(text)],
            metadata: None,
        }
    }

    #[test]
    fn text_part_is_plain_text() {
        let out = extract_content(&[Part::text("hello")]);
        assert_eq!(out, vec![(ContentPayload::Text("hello".into()), "text/plain".into())]);
    }

    #[test]
    fn empty_parts_yield_empty_content() {
        assert!(extract_content(&[]).is_empty());
    }

    #[test]
    fn file_parts_keep_declared_mime() {
        let parts = vec![
            Part::File {
                file: FileContent::Bytes(FileWithBytes {
                    bytes: "AAEC".into(),
                    mime_type: Some("image/png".into()),
                    name: None,
                }),
                metadata: None,
            },
            Part::File {
                file: FileContent::Uri(FileWithUri {
                    uri: "https://example.com/a.pdf".into(),
                    mime_type: None,
                    name: Some("a.pdf".into()),
                }),
                metadata: None,
            },
        ];
        let out = extract_content(&parts);
        assert_eq!(out[0], (ContentPayload::FileInline("AAEC".into()), "image/png".into()));
        assert_eq!(
            out[1],
            (ContentPayload::FileRef("https://example.com/a.pdf".into()), String::new())
        );
    }

    #[test]
    fn form_data_is_kept_structured() {
        let data = serde_json::json!({ "type": "form", "fields": ["name"] });
        let map = data.as_object().unwrap().clone();
        let out = extract_content(&[Part::data(map.clone())]);
        assert_eq!(out, vec![(ContentPayload::Structured(map), "form".into())]);
    }

    #[test]
    fn other_data_is_serialized_json() {
        let data = serde_json::json!({ "type": "chart", "x": 1 });
        let map = data.as_object().unwrap().clone();
        let out = extract_content(&[Part::data(map)]);
        assert_eq!(out[0].1, "application/json");
        let text = out[0].0.as_text().unwrap();
        let back: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn task_without_history_is_failed() {
        let task = Task {
            id: "t1".into(),
            context_id: Some("c1".into()),
            status: TaskStatus {
                state: TaskState::Working,
                ..Default::default()
            },
            history: vec![],
            artifacts: vec![],
        };
        let st = convert_task_to_state(&task);
        assert_eq!(st.state, "failed");
        assert_eq!(st.message.content.len(), 1);
        assert_eq!(st.message.content[0].0.as_text(), Some("No history"));
        assert_eq!(st.message.role, "agent");
        assert_eq!(st.message.task_id, "t1");
    }

    #[test]
    fn single_history_entry_does_not_duplicate_into_artifacts() {
        let task = Task {
            id: "t1".into(),
            context_id: None,
            status: TaskStatus {
                state: TaskState::Completed,
                ..Default::default()
            },
            history: vec![msg("m1", "only")],
            artifacts: vec![],
        };
        let st = convert_task_to_state(&task);
        assert_eq!(st.state, "completed");
        assert!(st.artifacts.is_empty());
        assert_eq!(st.message.message_id, "m1");
        assert_eq!(st.context_id, "");
    }

    #[test]
    fn conversation_id_precedence() {
        let mut task = Task {
            id: "t1".into(),
            context_id: Some("own".into()),
            status: TaskStatus {
                state: TaskState::Working,
                message: Some(msg("s1", "status")),
                timestamp: None,
            },
            history: vec![],
            artifacts: vec![],
        };
        assert_eq!(extract_conversation_id(&task), "own");
        task.context_id = None;
        assert_eq!(extract_conversation_id(&task), "c1");
        task.status.message = None;
        assert_eq!(extract_conversation_id(&task), "");
    }

    #[test]
    fn conversation_keeps_message_order_and_duplicates() {
        let conv = Conversation {
            conversation_id: "c1".into(),
            is_active: true,
            name: "chat".into(),
            task_ids: vec![],
            messages: vec![msg("m2", "b"), msg("m1", "a"), msg("m2", "b")],
        };
        let st = convert_conversation_to_state(&conv);
        assert_eq!(st.message_ids, vec!["m2", "m1", "m2"]);
        assert_eq!(st.conversation_name, "chat");
    }

    #[test]
    fn event_takes_context_from_nested_message() {
        let mut content = msg("m1", "hi");
        content.role = Role::User;
        let event = Event {
            id: "e1".into(),
            actor: "user".into(),
            content,
            timestamp: 0.0,
        };
        let st = convert_event_to_state(&event);
        assert_eq!(st.context_id, "c1");
        assert_eq!(st.role, "user");
        assert_eq!(st.content.len(), 1);
    }
}
