//! OpenAI-compatible completion backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::CompletionBackend;
use crate::config::LlmConfig;
use crate::error::{Error, Result};

pub struct OpenAiBackend {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(config: &LlmConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::LanguageModel(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(model = %config.chat_model, "completion backend ready");

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.chat_model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.api_base);
        let request = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": max_tokens,
            "temperature": self.temperature,
            "stream": false
        });

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::LanguageModel(format!("request to {} timed out", endpoint))
                } else if e.is_connect() {
                    Error::LanguageModel(format!("failed to connect to {}: {}", endpoint, e))
                } else {
                    Error::LanguageModel(format!("request to {} failed: {}", endpoint, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            return Err(Error::LanguageModel(format!(
                "{} returned HTTP {}: {}",
                endpoint, status, preview
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LanguageModel(format!("malformed completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::LanguageModel("completion response contained no content".into()))
    }
}
