use std::sync::Arc;

use tracing::{error, info, warn};

use super::prompt::{compose_prompt, SYSTEM_PERSONA};
use super::{SimulationError, SimulationOutcome, SimulationRequest};
use crate::config::TerraConfig;
use crate::health::HealthReport;
use crate::llm::{ChatMessage, ChatRequest, EnvCredentials, ProviderRegistry};
use crate::providers::{WeatherProvider, WeatherSnapshot};

pub const PRIMARY_TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 250;

/// Orchestrates one simulation: provider check, weather baseline, prompt, LLM call(s)
pub struct SimulationEngine {
    providers: Arc<ProviderRegistry>,
    weather: WeatherProvider,
}

impl SimulationEngine {
    pub fn new(providers: Arc<ProviderRegistry>, weather: WeatherProvider) -> Self {
        Self { providers, weather }
    }

    /// Wire up an engine whose LLM credentials come from the process environment
    pub fn from_config(config: &TerraConfig) -> crate::Result<Self> {
        let providers = ProviderRegistry::new(Arc::new(EnvCredentials), config.llm.clone());
        let weather = WeatherProvider::new(config.weather.clone())?;
        Ok(Self::new(Arc::new(providers), weather))
    }

    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.providers
    }

    pub async fn health(&self) -> HealthReport {
        HealthReport::collect(&self.providers, &self.weather).await
    }

    pub async fn simulate(
        &self,
        req: &SimulationRequest,
    ) -> Result<SimulationOutcome, SimulationError> {
        // Re-selection while unconfigured lets keys added after startup take effect
        let provider = self
            .providers
            .ensure()
            .await
            .ok_or(SimulationError::Unavailable)?;

        let baseline = self.weather.fetch_baseline(req.lat, req.lon).await;
        let prompt = compose_prompt(req, baseline.as_ref());

        let primary = ChatRequest {
            model: provider.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PERSONA),
                ChatMessage::user(prompt.clone()),
            ],
            temperature: Some(PRIMARY_TEMPERATURE),
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let err = match provider.client.complete(&primary).await {
            Ok(text) => return Ok(outcome(text, baseline)),
            Err(e) => e.to_string(),
        };
        error!(target: "simulation", model = %provider.model, error = %err, "AI error");

        if let Some(fallback_model) = provider.fallback_model() {
            info!(target: "simulation", model = %fallback_model, "Falling back to lower-capability model");
            let fallback = ChatRequest {
                model: fallback_model.to_string(),
                messages: vec![ChatMessage::user(prompt)],
                temperature: None,
                max_tokens: MAX_OUTPUT_TOKENS,
            };
            match provider.client.complete(&fallback).await {
                Ok(text) => return Ok(outcome(text, baseline)),
                Err(e) => {
                    warn!(target: "simulation", model = %fallback_model, error = %e, "Fallback model failed")
                }
            }
        }

        Err(SimulationError::engine(&err))
    }
}

fn outcome(text: String, baseline: Option<WeatherSnapshot>) -> SimulationOutcome {
    SimulationOutcome {
        analysis: text.trim().to_string(),
        baseline,
    }
}
