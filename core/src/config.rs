use std::fs;
use std::path::Path;

use crate::providers::WeatherConfig;
use crate::{Result, TerraError};

pub const DEFAULT_PORT: u16 = 5000;
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Top-level configuration for the simulation service
#[derive(Clone, Debug)]
pub struct TerraConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
}

/// HTTP bind address
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Endpoints and transport settings shared by both LLM providers.
/// API keys live outside this struct; the provider registry re-reads them
/// whenever selection runs.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub groq_base_url: String,
    pub openai_base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            groq_base_url: std::env::var("GROQ_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            request_timeout_ms: std::env::var("LLM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60_000),
        }
    }
}

impl Default for TerraConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl TerraConfig {
    /// Load configuration from a TOML file (path via TERRAX_CONFIG or ./terrax.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let path = std::env::var("TERRAX_CONFIG").unwrap_or_else(|_| "terrax.toml".into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        let default = Self::default();
        if !path.exists() {
            tracing::info!(target: "config", path = %path.display(), "No TOML config found; using defaults/env");
            return default;
        }
        match read_toml(path) {
            Ok(t) => t.overlay(default),
            Err(e) => {
                tracing::warn!(target: "config", path = %path.display(), error = %e, "Unusable TOML config; using defaults/env");
                default
            }
        }
    }

    /// Host and port in the form `TcpListener::bind` resolves (hostnames, IPv4 and bare IPv6)
    pub fn bind_target(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }
}

fn read_toml(path: &Path) -> Result<TerraToml> {
    let raw = fs::read_to_string(path)?;
    toml::from_str(&raw)
        .map_err(|e| TerraError::ConfigError(format!("{}: {e}", path.display())))
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct TerraToml {
    pub server: Option<ServerToml>,
    pub llm: Option<LlmToml>,
    pub weather: Option<WeatherToml>,
}

impl TerraToml {
    fn overlay(self, mut base: TerraConfig) -> TerraConfig {
        if let Some(s) = self.server {
            s.apply(&mut base.server);
        }
        if let Some(l) = self.llm {
            l.apply(&mut base.llm);
        }
        if let Some(w) = self.weather {
            w.apply(&mut base.weather);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
}
impl ServerToml {
    fn apply(self, s: &mut ServerConfig) {
        if let Some(v) = self.host {
            s.host = v;
        }
        if let Some(v) = self.port {
            s.port = v;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LlmToml {
    pub groq_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}
impl LlmToml {
    fn apply(self, l: &mut LlmConfig) {
        if let Some(v) = self.groq_base_url {
            l.groq_base_url = v;
        }
        if let Some(v) = self.openai_base_url {
            l.openai_base_url = v;
        }
        if let Some(v) = self.request_timeout_ms {
            l.request_timeout_ms = v;
        }
    }
}

// The weather key is a secret and the timeout is fixed; only the endpoint is file-configurable.
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct WeatherToml {
    pub api_endpoint: Option<String>,
}
impl WeatherToml {
    fn apply(self, w: &mut WeatherConfig) {
        if let Some(v) = self.api_endpoint {
            w.api_endpoint = v;
        }
    }
}
