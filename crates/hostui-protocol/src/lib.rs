//! Host UI Protocol - wire types and message definitions
//!
//! Mirrors the request/response contract of the conversation service:
//! JSON-RPC 2.0 envelopes posted to `<server>/<method>`, carrying A2A
//! messages, tasks, events and conversations.

pub mod constants;
pub mod error;
pub mod messages;
pub mod types;

pub use constants::*;
pub use error::*;
pub use messages::*;
pub use types::*;
