//! Typed JSON-RPC client for the conversation service.
//!
//! Every call posts an [`RpcRequest`] to `<base_url>/<method>` and decodes the
//! `result` field of the response. A `null` result comes back as `Ok(None)`.

use serde::de::DeserializeOwned;

use hostui_protocol::*;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct ConversationClient {
    base_url: String,
    http: reqwest::Client,
}

impl ConversationClient {
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_conversation(&self) -> Result<Option<Conversation>> {
        self.call(ProtocolMethod::CreateConversation, serde_json::Value::Null)
            .await
    }

    pub async fn list_conversation(&self) -> Result<Option<Vec<Conversation>>> {
        self.call(ProtocolMethod::ListConversations, serde_json::Value::Null)
            .await
    }

    pub async fn send_message(&self, message: &Message) -> Result<Option<SendMessageResult>> {
        self.call(ProtocolMethod::SendMessage, serde_json::to_value(message)?)
            .await
    }

    pub async fn list_messages(&self, conversation_id: &str) -> Result<Option<Vec<Message>>> {
        self.call(
            ProtocolMethod::ListMessages,
            serde_json::Value::String(conversation_id.to_string()),
        )
        .await
    }

    /// Pending message ids and their status.
    ///
    /// The service answers with a list of `[id, status]` pairs; an object
    /// keyed by id is accepted too.
    pub async fn get_pending_messages(&self) -> Result<Option<PendingMessages>> {
        let raw: Option<serde_json::Value> = self
            .call(ProtocolMethod::PendingMessages, serde_json::Value::Null)
            .await?;
        raw.map(decode_pending).transpose()
    }

    pub async fn get_events(&self) -> Result<Option<Vec<Event>>> {
        self.call(ProtocolMethod::GetEvents, serde_json::Value::Null)
            .await
    }

    pub async fn list_tasks(&self) -> Result<Option<Vec<Task>>> {
        self.call(ProtocolMethod::ListTasks, serde_json::Value::Null)
            .await
    }

    pub async fn register_agent(&self, address: &str) -> Result<Option<serde_json::Value>> {
        self.call(
            ProtocolMethod::RegisterAgent,
            serde_json::Value::String(address.to_string()),
        )
        .await
    }

    pub async fn list_agents(&self) -> Result<Option<Vec<AgentCard>>> {
        self.call(ProtocolMethod::ListAgents, serde_json::Value::Null)
            .await
    }

    /// Set the server-side model credential.
    pub async fn update_api_key(&self, api_key: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, API_KEY_UPDATE_PATH);
        let response = self
            .http
            .post(&url)
            .json(&ApiKeyUpdate {
                api_key: api_key.to_string(),
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: ProtocolMethod,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = RpcRequest::new(method, params);
        let url = format!("{}/{}", self.base_url, method.as_str());
        tracing::trace!(%url, id = %request.id, "conversation service call");

        let response = self.http.post(&url).json(&request).send().await?;
        let response = check_status(response).await?;
        let envelope: RpcResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(envelope.into_result()?)
    }
}

/// Read the agent card a remote agent publishes at its well-known path.
///
/// `address` may omit the scheme, as typed into the agents dialog.
pub async fn fetch_agent_card(http: &reqwest::Client, address: &str) -> Result<AgentCard> {
    let base = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    let url = format!("{}{}", base.trim_end_matches('/'), AGENT_CARD_PATH);
    let response = check_status(http.get(&url).send().await?).await?;
    Ok(response.json::<AgentCard>().await?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

fn decode_pending(value: serde_json::Value) -> Result<PendingMessages> {
    match value {
        serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => {
            let pairs: Vec<(String, String)> = serde_json::from_value(other)?;
            Ok(pairs.into_iter().collect())
        }
    }
}
