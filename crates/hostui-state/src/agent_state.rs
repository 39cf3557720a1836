use hostui_protocol::AgentCard;
use serde::{Deserialize, Serialize};

/// State of the remote agents page and its "add agent" dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AgentState {
    pub agent_dialog_open: bool,
    pub agent_address: String,
    pub agent_name: String,
    pub agent_description: String,
    pub input_modes: Vec<String>,
    pub output_modes: Vec<String>,
    pub stream_supported: bool,
    pub push_notifications_supported: bool,
    pub error: String,
    pub agent_framework_type: String,
    /// Agents cached for the page
    pub agents: Vec<AgentCard>,
    pub agents_loaded: bool,
}

impl AgentState {
    pub fn open_dialog(&mut self) {
        self.agent_dialog_open = true;
    }

    /// Close the dialog and forget the card being entered.
    pub fn close_dialog(&mut self) {
        *self = Self {
            agents: std::mem::take(&mut self.agents),
            agents_loaded: self.agents_loaded,
            ..Self::default()
        };
    }

    /// Fill the dialog from a card fetched at `address`.
    pub fn apply_card(&mut self, address: &str, card: &AgentCard) {
        self.agent_address = address.to_string();
        self.agent_name = card.name.clone();
        self.agent_description = card.description.clone().unwrap_or_default();
        self.input_modes = card.default_input_modes.clone();
        self.output_modes = card.default_output_modes.clone();
        self.stream_supported = card.capabilities.streaming.unwrap_or(false);
        self.push_notifications_supported =
            card.capabilities.push_notifications.unwrap_or(false);
        self.error.clear();
    }

    pub fn set_error(&mut self, address: &str, error: impl Into<String>) {
        self.agent_address = address.to_string();
        self.agent_name.clear();
        self.error = error.into();
    }

    pub fn set_agents(&mut self, agents: Vec<AgentCard>) {
        self.agents = agents;
        self.agents_loaded = true;
    }
}
