//! Simulation request handling: prompt composition and LLM orchestration

mod engine;
mod prompt;

pub use engine::SimulationEngine;
pub use prompt::{compose_prompt, SYSTEM_PERSONA};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::WeatherSnapshot;

/// Upstream error text is cut to this many characters before reaching callers
pub const MAX_ERROR_DETAIL_CHARS: usize = 150;

/// User-supplied scenario. Percentages are signed changes relative to today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub carbon_change: i64,
    pub pop_growth: i64,
    pub econ_shift: i64,
    pub resource_use: i64,
}

/// Successful simulation result, serialized as the HTTP response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub analysis: String,
    pub baseline: Option<WeatherSnapshot>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("AI Simulation Engine Offline. Please check your GROQ_API_KEY in .env")]
    Unavailable,

    #[error("Simulation Engine Error: {0}")]
    Engine(String),
}

impl SimulationError {
    /// Engine error carrying at most `MAX_ERROR_DETAIL_CHARS` of the upstream message
    pub fn engine(detail: &str) -> Self {
        SimulationError::Engine(detail.chars().take(MAX_ERROR_DETAIL_CHARS).collect())
    }
}
