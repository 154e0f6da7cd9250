//! Client for the hosted chat-completion endpoint.

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::context::{Message, Role};
use crate::error::{AssistantError, Result};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Shown when the endpoint answers without any usable content.
const EMPTY_REPLY: &str = "Sorry, I could not get a response.";

/// One message as the endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: match message.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: message.text.clone(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// One POST per call; failures are never retried.
    ///
    /// Error mapping mirrors how the caller has to apologise: a transport
    /// failure keeps its `reqwest` error, a body that is not JSON becomes
    /// `MalformedResponse`, and a non-success status becomes
    /// `ExternalService` carrying the endpoint's own error message when the
    /// body yields one.
    pub async fn chat(&self, messages: &[WireMessage]) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };
        debug!(
            "forwarding {} messages to completion endpoint",
            messages.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|error| AssistantError::MalformedResponse(error.to_string()))?;

        if !status.is_success() {
            let detail = value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            return Err(AssistantError::ExternalService(detail));
        }

        let parsed: ChatCompletionResponse = serde_json::from_value(value)
            .map_err(|error| AssistantError::MalformedResponse(error.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}
