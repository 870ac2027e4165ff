//! OpenAI-compatible chat-completions provider.
//!
//! Works against anything speaking the `/chat/completions` dialect,
//! including local Ollama and vLLM endpoints.

use crate::llm::{ChatMessage, Completion, CompletionParams, LlmClient};
use crate::retry::{with_retry, RetryConfig};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use vesna_core::config::LlmConfig;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    completion_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            retry: RetryConfig::default(),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
    ) -> Result<Completion> {
        let mut body_messages = vec![json!({"role": "system", "content": system})];
        for msg in &messages {
            body_messages.push(json!({"role": msg.role.as_str(), "content": msg.content}));
        }
        let body = json!({
            "model": self.model,
            "messages": body_messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = with_retry(&self.retry, "openai", || {
            let mut request = self.client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            async move { request.send().await.context("sending chat request") }
        })
        .await?;

        let parsed: ChatResponse = response.json().await.context("decoding chat response")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        Ok(Completion {
            content,
            token_count: parsed.usage.and_then(|u| u.completion_tokens),
        })
    }
}
