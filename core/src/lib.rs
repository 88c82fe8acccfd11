// TERRA-X Core Library
// Planetary simulation oracle: provider selection, weather baseline, prompt + LLM orchestration

pub mod config;
pub mod health;
pub mod llm;
pub mod providers;
pub mod simulation;

// Export core types
pub use config::TerraConfig;
pub use health::HealthReport;
pub use llm::{ChatClient, ChatModel, ProviderKeys, ProviderKind, ProviderRegistry};
pub use providers::{WeatherProvider, WeatherSnapshot};
pub use simulation::{SimulationEngine, SimulationError, SimulationOutcome, SimulationRequest};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerraError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Weather error: {0}")]
    WeatherError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
pub type Result<T> = std::result::Result<T, TerraError>;
