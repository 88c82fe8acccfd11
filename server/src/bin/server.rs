use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use terrax_core::{SimulationEngine, TerraConfig};
use terrax_server::serve;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal in deployed environments
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = TerraConfig::load();
    let engine = SimulationEngine::from_config(&config)?;

    let health = engine.health().await;
    tracing::info!(
        ai_active = health.ai_active,
        engine = %health.engine,
        weather_active = health.weather_active,
        "Engine configured"
    );

    let (host, port) = config.bind_target();
    serve(host, port, Arc::new(engine))
        .await
        .map_err(|e| e.into())
}
