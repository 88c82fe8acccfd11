//! LLM module: provider selection, process-wide provider state, and the HTTP client
//!
//! This module provides:
//! - `ChatClient`, `ChatRequest`, `ChatModel` for talking to OpenAI-compatible backends
//! - `select_provider` / `ProviderKind` for choosing Groq or OpenAI by credential
//! - `ProviderRegistry` holding the selected provider, re-resolved on demand

mod client;
mod provider;
mod registry;

pub use client::{ChatClient, ChatClientConfig, ChatMessage, ChatModel, ChatRequest, ChatRole};
#[cfg(test)]
pub use client::MockChatModel;
pub use provider::{
    mask_key, select_provider, ActiveProvider, CredentialSource, EnvCredentials, ProviderKeys,
    ProviderKind, GROQ_FALLBACK_MODEL, GROQ_KEY_ENV, GROQ_PRIMARY_MODEL, OPENAI_KEY_ENV,
    OPENAI_MODEL,
};
pub use registry::ProviderRegistry;
