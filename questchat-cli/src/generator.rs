//! Assistant reply generation through an OpenAI-compatible chat-completions API.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GeneratorConfig;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key found in ${var}")]
    MissingApiKey { var: String },
    #[error("reply generation timed out after {secs}s")]
    Timeout { secs: u64 },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation service returned status {status}")]
    Status { status: u16 },
    #[error("generation service returned an empty reply")]
    EmptyReply,
}

/// Produces the assistant's reply to a user message.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, message: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Posts a system prompt plus the user message and returns the first choice.
pub struct ChatCompletionClient {
    config: GeneratorConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionClient {
    /// Reads the API key from the environment variable named in `config`.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_none() {
            log::warn!("${} is not set; replies will be unavailable", config.api_key_env);
        }
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn request_body(&self, message: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
        }
    }
}

fn first_reply(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyReply)
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, message: &str) -> Result<String, GenerationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::MissingApiKey {
                var: self.config.api_key_env.clone(),
            });
        };
        log::debug!("requesting reply from {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(message))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        first_reply(body)
    }
}
