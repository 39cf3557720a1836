//! Page registry and on-load priming of the view-state.

use serde::{Deserialize, Serialize};

use hostui_state::{AgentState, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Agents,
    Conversation,
    EventList,
    Settings,
    TaskList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    pub path: &'static str,
    pub title: &'static str,
    pub kind: PageKind,
    /// Whether background refresh runs while this page is shown
    pub enable_polling: bool,
}

pub const PAGES: &[PageSpec] = &[
    PageSpec {
        path: "/",
        title: "Chat",
        kind: PageKind::Home,
        enable_polling: true,
    },
    // Refreshing here re-renders the agent dialog in a loop.
    PageSpec {
        path: "/agents",
        title: "Agents",
        kind: PageKind::Agents,
        enable_polling: false,
    },
    PageSpec {
        path: "/conversation",
        title: "Conversation",
        kind: PageKind::Conversation,
        enable_polling: true,
    },
    PageSpec {
        path: "/event_list",
        title: "Event List",
        kind: PageKind::EventList,
        enable_polling: true,
    },
    PageSpec {
        path: "/settings",
        title: "Settings",
        kind: PageKind::Settings,
        enable_polling: true,
    },
    PageSpec {
        path: "/task_list",
        title: "Task List",
        kind: PageKind::TaskList,
        enable_polling: true,
    },
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub conversation_id: Option<String>,
}

/// Credentials known to the host at startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub uses_vertex_ai: bool,
}

/// Prime the snapshot for a page load.
///
/// The `conversation_id` query parameter selects the active conversation;
/// without it the selection is cleared. The API key dialog opens when no
/// credential is available.
pub fn on_load(state: &mut AppState, query: &PageQuery, credentials: &Credentials) {
    state.current_conversation_id = query.conversation_id.clone().unwrap_or_default();

    if credentials.uses_vertex_ai {
        state.uses_vertex_ai = true;
    } else if let Some(key) = credentials.api_key.as_deref().filter(|k| !k.is_empty()) {
        state.api_key = key.to_string();
    } else if state.api_key.is_empty() {
        state.api_key_dialog_open = true;
    }
}

/// Response body of a page route.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: PageSpec,
    pub state: AppState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<AgentState>,
}
