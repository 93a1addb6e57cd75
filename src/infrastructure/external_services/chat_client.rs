use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::chat_model::{ChatMessage, ChatModel, ChatModelError};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub service_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            service_url: env::var("CHAT_SERVICE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            api_key: env::var("CHAT_API_KEY").ok(),
            model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4.1".to_string()),
            timeout_secs: 60,
        }
    }
}

/// HTTP client for an OpenAI-style chat completions endpoint.
pub struct HttpChatModel {
    client: reqwest::Client,
    config: ChatClientConfig,
}

impl HttpChatModel {
    pub fn new(config: ChatClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(ChatClientConfig::default())
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatModelError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
        };

        let mut builder = self.client.post(&self.config.service_url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ChatModelError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(ChatModelError::ApiError(format!(
                "Chat service returned status {}",
                response.status()
            )));
        }

        let completion = response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| ChatModelError::ApiError(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatModelError::ApiError("No completion returned".to_string()))
    }
}
