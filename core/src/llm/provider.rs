use std::fmt;
use std::sync::Arc;


use super::client::ChatModel;
use crate::config::LlmConfig;

pub const GROQ_KEY_ENV: &str = "GROQ_API_KEY";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Primary Groq model; the only one that has a fallback
pub const GROQ_PRIMARY_MODEL: &str = "llama-3.3-70b-versatile";
pub const GROQ_FALLBACK_MODEL: &str = "llama3-8b-8192";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// External LLM vendors, in selection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Groq,
    OpenAi,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "Groq",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    /// Prefix every well-formed key of this vendor starts with
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "gsk_",
            ProviderKind::OpenAi => "sk-",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => GROQ_PRIMARY_MODEL,
            ProviderKind::OpenAi => OPENAI_MODEL,
        }
    }

    pub fn base_url<'a>(&self, cfg: &'a LlmConfig) -> &'a str {
        match self {
            ProviderKind::Groq => &cfg.groq_base_url,
            ProviderKind::OpenAi => &cfg.openai_base_url,
        }
    }

    fn accepts(&self, key: &str) -> bool {
        !key.is_empty() && key.starts_with(self.key_prefix())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw credentials as found in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderKeys {
    pub groq: Option<String>,
    pub openai: Option<String>,
}

/// Where the registry reads credentials from each time selection runs
pub trait CredentialSource: Send + Sync {
    fn provider_keys(&self) -> ProviderKeys;
}

/// Fixed credentials
impl CredentialSource for ProviderKeys {
    fn provider_keys(&self) -> ProviderKeys {
        self.clone()
    }
}

/// Reads `GROQ_API_KEY` / `OPENAI_API_KEY` from the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn provider_keys(&self) -> ProviderKeys {
        ProviderKeys {
            groq: std::env::var(GROQ_KEY_ENV).ok(),
            openai: std::env::var(OPENAI_KEY_ENV).ok(),
        }
    }
}

/// Pick the first provider whose key is present and well-formed.
/// Keys are trimmed; the returned key is the trimmed one.
pub fn select_provider(keys: &ProviderKeys) -> Option<(ProviderKind, String)> {
    let candidates = [
        (ProviderKind::Groq, keys.groq.as_deref()),
        (ProviderKind::OpenAi, keys.openai.as_deref()),
    ];
    candidates.into_iter().find_map(|(kind, key)| {
        let key = key.unwrap_or_default().trim();
        kind.accepts(key).then(|| (kind, key.to_string()))
    })
}

/// First six and last four characters of a key, for logs
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}...{tail}")
}

/// A selected provider: the client handle plus the model to ask for
#[derive(Clone)]
pub struct ActiveProvider {
    pub kind: ProviderKind,
    pub model: String,
    pub client: Arc<dyn ChatModel>,
}

impl ActiveProvider {
    pub fn new(kind: ProviderKind, model: impl Into<String>, client: Arc<dyn ChatModel>) -> Self {
        Self {
            kind,
            model: model.into(),
            client,
        }
    }

    /// Lower-capability model to retry with, only when running the Llama 3.3 variant
    pub fn fallback_model(&self) -> Option<&'static str> {
        self.model
            .contains("llama-3.3")
            .then_some(GROQ_FALLBACK_MODEL)
    }
}

impl fmt::Debug for ActiveProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveProvider")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
