use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::client::{ChatClient, ChatClientConfig};
use super::provider::{mask_key, select_provider, ActiveProvider, CredentialSource};
use crate::config::LlmConfig;

/// Process-wide provider state.
///
/// Holds the currently selected provider, if any. Selection runs once at
/// construction; when it found nothing, `ensure` re-runs it on demand so
/// credentials added after startup are picked up. Concurrent re-selection is
/// harmless: every writer derives the same value from the same credentials.
pub struct ProviderRegistry {
    credentials: Arc<dyn CredentialSource>,
    config: LlmConfig,
    active: RwLock<Option<ActiveProvider>>,
}

impl ProviderRegistry {
    /// Create the registry and run the initial selection
    pub fn new(credentials: Arc<dyn CredentialSource>, config: LlmConfig) -> Self {
        let active = resolve(credentials.as_ref(), &config);
        Self {
            credentials,
            config,
            active: RwLock::new(active),
        }
    }

    /// Replace whatever the initial selection produced with a given provider
    pub fn with_provider(mut self, provider: ActiveProvider) -> Self {
        self.active = RwLock::new(Some(provider));
        self
    }

    /// Current provider without attempting re-selection
    pub async fn current(&self) -> Option<ActiveProvider> {
        self.active.read().await.clone()
    }

    /// Current provider, re-running selection first if none is active
    pub async fn ensure(&self) -> Option<ActiveProvider> {
        if let Some(active) = self.current().await {
            return Some(active);
        }
        let resolved = resolve(self.credentials.as_ref(), &self.config);
        let mut slot = self.active.write().await;
        if slot.is_none() {
            *slot = resolved;
        }
        slot.clone()
    }
}

fn resolve(credentials: &dyn CredentialSource, config: &LlmConfig) -> Option<ActiveProvider> {
    let Some((kind, key)) = select_provider(&credentials.provider_keys()) else {
        error!(target: "provider", "No valid AI keys found (GROQ_API_KEY / OPENAI_API_KEY)");
        return None;
    };
    info!(
        target: "provider",
        provider = %kind,
        key = %mask_key(&key),
        "Initializing {} client", kind
    );

    let client = ChatClient::new(ChatClientConfig {
        base_url: kind.base_url(config).to_string(),
        api_key: key,
        request_timeout_ms: config.request_timeout_ms,
    });
    match client {
        Ok(client) => Some(ActiveProvider::new(
            kind,
            kind.default_model(),
            Arc::new(client),
        )),
        Err(e) => {
            warn!(target: "provider", provider = %kind, error = %e, "Failed to build LLM client");
            None
        }
    }
}
