//! Weather client: city name → current temperature in Celsius.

use std::time::Instant;

use crate::config::{TimeoutConfig, WeatherConfig};
use crate::observability::metrics::{self, Outcome};
use crate::upstream::types::{ClientBuildError, CurrentWeather, WeatherError};

const TARGET: &str = "weather";
const CURRENT_PATH: &str = "/v1/current.json";

/// Client for a WeatherAPI-style current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig, timeouts: &TimeoutConfig) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.outbound())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current temperature for `city`. The city is sent percent-encoded in `q`.
    #[tracing::instrument(name = "get_temperature", skip_all, fields(city = %city, otel.kind = "client"))]
    pub async fn current_celsius(&self, city: &str) -> Result<f64, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let start = Instant::now();
        let result = self.fetch(api_key, city).await;
        metrics::record_outbound(TARGET, Outcome::of(&result), start);
        result
    }

    async fn fetch(&self, api_key: &str, city: &str) -> Result<f64, WeatherError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, CURRENT_PATH))
            .query(&[("key", api_key), ("q", city)])
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let weather: CurrentWeather = response.json().await.map_err(|e| {
            if e.is_decode() {
                WeatherError::Parse(e)
            } else {
                WeatherError::Transport(e)
            }
        })?;
        Ok(weather.current.temp_c)
    }
}
