use serde::{Deserialize, Serialize};

use crate::llm::ProviderRegistry;
use crate::providers::WeatherProvider;

/// Fixed-shape status record for `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub ai_active: bool,
    /// Model identifier of the selected provider, or "NONE"
    pub engine: String,
    pub weather_active: bool,
}

impl HealthReport {
    /// Snapshot of current state; never triggers provider re-selection
    pub async fn collect(providers: &ProviderRegistry, weather: &WeatherProvider) -> Self {
        let active = providers.current().await;
        Self {
            status: "online".to_string(),
            ai_active: active.is_some(),
            engine: active.map_or_else(|| "NONE".to_string(), |p| p.model),
            weather_active: weather.is_configured(),
        }
    }
}
