//! Chat-completion client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant is disabled: no API key configured")]
    Disabled,

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion API returned no text")]
    EmptyResponse,
}

/// One-shot text generation
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a reply to `prompt` under the `system` instruction
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatClient {
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AssistantError::Disabled)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_key() {
        let config = AssistantConfig::default();
        assert!(matches!(
            ChatClient::new(&config),
            Err(AssistantError::Disabled)
        ));

        let config = AssistantConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(ChatClient::new(&config).is_ok());
    }

    #[test]
    fn test_response_shape() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":" hi "}}]}"#;
        let reply: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply.choices[0].message.content.as_deref(), Some(" hi "));
    }
}
