use crate::{Result, TerraError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Connection settings for one OpenAI-compatible backend
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String, // e.g., https://api.groq.com/openai/v1
    pub api_key: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Chat Completions request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Omitted from the wire when unset so the backend applies its own default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

/// Anything that can turn a chat request into assistant text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// HTTP client for the Chat Completions API (OpenAI and Groq share the wire format)
#[derive(Clone)]
pub struct ChatClient {
    pub(crate) http: Client,
    pub(crate) cfg: ChatClientConfig,
}

impl ChatClient {
    pub fn new(cfg: ChatClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| TerraError::LlmError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    /// Contract:
    /// - Input: ChatRequest (model, messages, sampling)
    /// - Output: assistant text of the first choice, untrimmed
    /// - Error: transport, non-2xx status, or a body without choices[0].message.content
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let chat_url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        debug!(
            target: "llm_client",
            model = %request.model,
            "POST {} via Chat Completions", chat_url
        );

        let resp = self
            .http
            .post(&chat_url)
            .bearer_auth(&self.cfg.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TerraError::LlmError(format!("Chat Completions HTTP error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            error!(target: "llm_client", %status, body = %text, "Chat Completions error");
            return Err(TerraError::LlmError(format!(
                "Chat Completions error: status={} body={}",
                status, text
            )));
        }

        let val: serde_json::Value = resp.json().await.map_err(|e| {
            TerraError::LlmError(format!("Failed to parse Chat Completions JSON: {e}"))
        })?;
        extract_text_from_chat_completions(&val).ok_or_else(|| {
            TerraError::LlmError("Missing choices[0].message.content in chat completions".into())
        })
    }
}

fn extract_text_from_chat_completions(v: &serde_json::Value) -> Option<String> {
    v.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}
