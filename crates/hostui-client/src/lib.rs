//! Talks to the conversation service on behalf of the UI.
//!
//! - [`client::ConversationClient`] issues typed JSON-RPC calls.
//! - [`http::HttpClientHandle`] owns the process-wide HTTP client.
//! - [`service::HostAgentService`] is the best-effort adapter that keeps the
//!   view-state snapshot in sync with the backend.
//! - [`poller::WebSocketPoller`] receives pushed snapshots.

pub mod client;
pub mod error;
pub mod http;
pub mod poller;
pub mod service;

pub use client::ConversationClient;
pub use error::ClientError;
pub use http::HttpClientHandle;
pub use poller::{WebSocketAction, WebSocketPoller};
pub use service::{ConversationBackend, HostAgentService, RemoteBackend};
