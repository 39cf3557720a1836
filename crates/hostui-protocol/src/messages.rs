use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::JSONRPC_VERSION;
use crate::error::ProtocolError;

/// Methods exposed by the conversation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolMethod {
    CreateConversation,
    ListConversations,
    SendMessage,
    ListMessages,
    PendingMessages,
    GetEvents,
    ListTasks,
    RegisterAgent,
    ListAgents,
}

impl ProtocolMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateConversation => "conversation/create",
            Self::ListConversations => "conversation/list",
            Self::SendMessage => "message/send",
            Self::ListMessages => "message/list",
            Self::PendingMessages => "message/pending",
            Self::GetEvents => "events/get",
            Self::ListTasks => "task/list",
            Self::RegisterAgent => "agent/register",
            Self::ListAgents => "agent/list",
        }
    }
}

impl std::fmt::Display for ProtocolMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-RPC 2.0 request envelope, posted to `<server>/<method>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(method: ProtocolMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: uuid::Uuid::new_v4().simple().to_string(),
            method: method.as_str().to_string(),
            params,
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Decode the `result` field. A missing or `null` result is `Ok(None)`.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<Option<T>, ProtocolError> {
        if let Some(err) = self.error {
            return Err(ProtocolError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        match self.result {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Body of the credential update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyUpdate {
    pub api_key: String,
}

/// Frame exchanged on the push-update channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope<T> {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: T,
}

impl<T> PushEnvelope<T> {
    pub fn state_update(data: T) -> Self {
        Self {
            kind: crate::constants::STATE_UPDATE_TYPE.to_string(),
            data,
        }
    }

    pub fn action(data: T) -> Self {
        Self {
            kind: crate::constants::ACTION_TYPE.to_string(),
            data,
        }
    }
}
