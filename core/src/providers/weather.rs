//! Weather Baseline Provider
//!
//! Fetches current conditions from the OpenWeatherMap current-weather API to
//! ground simulation prompts. Every failure degrades to "no baseline".

use crate::{Result, TerraError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const WEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const OPENWEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Configuration for weather provider
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API endpoint (default: OpenWeatherMap current weather)
    pub api_endpoint: String,
    /// API key; `None` disables lookups entirely
    pub api_key: Option<String>,
    /// Timeout for API requests in milliseconds
    pub timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: std::env::var("OPENWEATHER_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| OPENWEATHER_ENDPOINT.to_string()),
            api_key: std::env::var(WEATHER_KEY_ENV).ok().filter(|s| !s.is_empty()),
            timeout_ms: 5_000,
        }
    }
}

/// Current conditions at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius
    pub temp: f64,
    pub desc: String,
    /// Relative humidity, percent
    pub humidity: i64,
}

/// Weather response from OpenWeatherMap (only the fields we read)
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// Weather baseline provider
pub struct WeatherProvider {
    config: WeatherConfig,
    http_client: reqwest::Client,
}

impl WeatherProvider {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent("terrax-engine/0.1")
            .build()
            .map_err(|e| TerraError::WeatherError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Whether a weather API key is configured
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Current conditions for a coordinate, or `None` when unconfigured or on any failure
    pub async fn fetch_baseline(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        let key = self.config.api_key.as_deref()?;
        match self.fetch_current(lat, lon, key).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(target: "weather", lat = %lat, lon = %lon, error = %e, "Weather lookup failed; continuing without baseline");
                None
            }
        }
    }

    async fn fetch_current(&self, lat: f64, lon: f64, key: &str) -> Result<WeatherSnapshot> {
        debug!(target: "weather", lat = %lat, lon = %lon, "Fetching weather data");

        let response = self
            .http_client
            .get(&self.config.api_endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| TerraError::WeatherError(format!("Weather API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TerraError::WeatherError(format!(
                "Weather API returned status: {}",
                response.status()
            )));
        }

        let body: CurrentWeatherResponse = response.json().await.map_err(|e| {
            TerraError::WeatherError(format!("Failed to parse weather response: {e}"))
        })?;

        let desc = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| TerraError::WeatherError("Weather response has no conditions".into()))?;

        Ok(WeatherSnapshot {
            temp: body.main.temp,
            desc,
            humidity: body.main.humidity,
        })
    }
}
