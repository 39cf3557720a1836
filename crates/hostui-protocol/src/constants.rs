/// JSON-RPC protocol version carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Endpoint that sets the server-side model credential.
pub const API_KEY_UPDATE_PATH: &str = "/api_key/update";

/// Well-known path where a remote agent publishes its card.
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Upgrade path of the push-update channel.
pub const PUSH_CHANNEL_PATH: &str = "/__ws__";

/// Envelope `type` of a pushed state snapshot.
pub const STATE_UPDATE_TYPE: &str = "state_update";

/// Envelope `type` of a client-relayed action.
pub const ACTION_TYPE: &str = "action";

/// Timeout applied to the shared HTTP client.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Placeholder text of a task that has no message history.
pub const NO_HISTORY_TEXT: &str = "No history";
