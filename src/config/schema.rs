//! Configuration schema definitions.
//!
//! Each service has its own root struct. All types derive Serde traits for
//! deserialization from TOML and fall back to the documented defaults for
//! anything left out.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ZIPKIN_ENDPOINT: &str = "http://localhost:9411/api/v2/spans";
pub const DEFAULT_SERVICE_B_URL: &str = "http://serviceb:8081/cep";
pub const DEFAULT_DIRECTORY_BASE_URL: &str = "https://viacep.com.br";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weatherapi.com";

/// Root configuration for the entry service (serviceA).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where validated requests are relayed.
    pub downstream: DownstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::with_port(8080),
            downstream: DownstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Root configuration for the resolution service (serviceB).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Postal directory API.
    pub directory: DirectoryConfig,

    /// Weather API.
    pub weather: WeatherConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::with_port(8081),
            directory: DirectoryConfig::default(),
            weather: WeatherConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
        }
    }

    /// Bind address (e.g., "0.0.0.0:8080").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::with_port(8080)
    }
}

/// Downstream (resolution service) endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Full URL of the resolution service's `/cep` route. Plain HTTP only.
    pub url: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_B_URL.to_string(),
        }
    }
}

/// Postal directory API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Scheme and host; lookups go to `{base_url}/ws/{cep}/json/`.
    pub base_url: String,

    /// Skip TLS certificate verification for directory lookups.
    /// Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTORY_BASE_URL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// Weather API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Scheme and host; lookups go to `{base_url}/v1/current.json`.
    pub base_url: String,

    /// API key. Requests fail with an internal error while unset.
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl WeatherConfig {
    /// The configured key, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on each outbound call (send plus body read) in seconds.
    pub outbound_secs: u64,

    /// Bound on handling one inbound request in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn outbound(&self) -> Duration {
        Duration::from_secs(self.outbound_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            outbound_secs: 10,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Export spans to Zipkin.
    pub tracing_enabled: bool,

    /// Zipkin collector endpoint.
    pub zipkin_endpoint: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            tracing_enabled: true,
            zipkin_endpoint: DEFAULT_ZIPKIN_ENDPOINT.to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_defaults() {
        let config = EntryConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.downstream.url, "http://serviceb:8081/cep");
        assert_eq!(config.timeouts.outbound(), Duration::from_secs(10));
        assert_eq!(
            config.observability.zipkin_endpoint,
            "http://localhost:9411/api/v2/spans"
        );
    }

    #[test]
    fn resolver_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.listener.port, 8081);
        assert!(config.weather.api_key.is_none());
        assert!(!config.directory.accept_invalid_certs);
        assert_eq!(config.directory.base_url, "https://viacep.com.br");
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let weather = WeatherConfig {
            api_key: Some(String::new()),
            ..WeatherConfig::default()
        };
        assert_eq!(weather.api_key(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ResolverConfig = toml::from_str(
            r#"
            [listener]
            port = 9000

            [weather]
            api_key = "abc"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.weather.api_key(), Some("abc"));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.outbound_secs, 10);
    }
}
