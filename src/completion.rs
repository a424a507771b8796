use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::RuntimeConfig;

/// One round trip to the opaque text-completion collaborator.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub require_json_object: bool,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

/// OpenAI-compatible `/chat/completions` client. The API key is read once at
/// construction so a missing key fails at coordinator build time, not at the
/// first planning call.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub fn from_config(cfg: &RuntimeConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.completion_api_key_env).with_context(|| {
            format!(
                "completion service requires api key env '{}' but it is missing",
                cfg.completion_api_key_env
            )
        })?;
        if api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "completion api key env '{}' is set but empty",
                cfg.completion_api_key_env
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.call_timeout_secs))
            .build()
            .context("failed to build completion HTTP client")?;

        Ok(Self {
            client,
            base_url: cfg.completion_base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key: api_key.trim().to_string(),
        })
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let messages = vec![
            ChatMessage {
                role: "system",
                content: request.system_instruction,
            },
            ChatMessage {
                role: "user",
                content: request.user_content,
            },
        ];

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
        });
        if request.require_json_object {
            payload["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("failed to send completion request to '{url}'"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("completion API error {status}: {body}"));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .context("failed to parse completion response body")?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(anyhow::anyhow!("completion reply contained no content"));
        }

        Ok(text)
    }
}
