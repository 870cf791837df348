//! Upstream error definitions and wire payloads.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::resilience::timeouts::Elapsed;

/// Failure taxonomy shared by every layer.
///
/// The HTTP layer maps kinds to status codes; only the first four are
/// visible to callers, the rest collapse to a generic internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    MethodNotAllowed,
    Validation,
    NotFound,
    Configuration,
    Upstream,
    Transport,
}

/// Errors from the postal directory lookup.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Non-2xx status, provider error marker, or empty city.
    #[error("postal code not found")]
    NotFound,

    /// The directory could not be reached or timed out.
    #[error("directory request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A 2xx response whose body is not the expected JSON.
    #[error("directory response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::NotFound => ErrorKind::NotFound,
            DirectoryError::Transport(_) => ErrorKind::Transport,
            DirectoryError::Decode(_) => ErrorKind::Upstream,
        }
    }
}

/// Errors from the current-weather lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("WEATHER_API_KEY not set")]
    MissingApiKey,

    #[error("weather api returned status {0}")]
    Status(u16),

    #[error("weather response could not be parsed: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("weather request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::MissingApiKey => ErrorKind::Configuration,
            WeatherError::Status(_) | WeatherError::Parse(_) => ErrorKind::Upstream,
            WeatherError::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Errors relaying a request to the resolution service.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("error calling service B: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service B response exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("service B did not answer: {0}")]
    Timeout(#[from] Elapsed),
}

impl ForwardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForwardError::Encode(_) | ForwardError::TooLarge { .. } => ErrorKind::Upstream,
            ForwardError::Transport(_) | ForwardError::Timeout(_) => ErrorKind::Transport,
        }
    }
}

/// Errors constructing a client at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Directory API record. Only the fields the lookup needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryRecord {
    #[serde(default)]
    pub localidade: String,

    /// Set when the provider sent an `erro` field at all, whatever its value.
    #[serde(default, deserialize_with = "field_present")]
    pub erro: bool,
}

fn field_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

impl DirectoryRecord {
    /// The city, unless the record carries the error marker or no city.
    pub fn into_city(self) -> Option<String> {
        if self.erro || self.localidade.is_empty() {
            None
        } else {
            Some(self.localidade)
        }
    }
}

/// Weather API current-conditions payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_error_marker_has_no_city() {
        let record: DirectoryRecord = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert_eq!(record.into_city(), None);

        let record: DirectoryRecord = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert_eq!(record.into_city(), None);
    }

    #[test]
    fn null_error_marker_still_counts() {
        let record: DirectoryRecord =
            serde_json::from_str(r#"{"localidade": "São Paulo", "erro": null}"#).unwrap();
        assert!(record.erro);
        assert_eq!(record.into_city(), None);

        let record: DirectoryRecord = serde_json::from_str(r#"{"localidade": "São Paulo"}"#).unwrap();
        assert!(!record.erro);
    }

    #[test]
    fn record_with_empty_city_has_no_city() {
        let record: DirectoryRecord =
            serde_json::from_str(r#"{"cep": "01310-930", "localidade": ""}"#).unwrap();
        assert_eq!(record.into_city(), None);
    }

    #[test]
    fn record_with_city() {
        let record: DirectoryRecord = serde_json::from_str(
            r#"{"cep": "01310-930", "logradouro": "Avenida Paulista", "localidade": "São Paulo", "uf": "SP"}"#,
        )
        .unwrap();
        assert_eq!(record.into_city().as_deref(), Some("São Paulo"));
    }

    #[test]
    fn weather_payload_reads_nested_celsius() {
        let weather: CurrentWeather = serde_json::from_str(
            r#"{"location": {"name": "Sao Paulo"}, "current": {"temp_c": 21.5, "temp_f": 70.7}}"#,
        )
        .unwrap();
        assert_eq!(weather.current.temp_c, 21.5);
    }

    #[test]
    fn kinds() {
        assert_eq!(DirectoryError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(WeatherError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(WeatherError::Status(401).kind(), ErrorKind::Upstream);
        assert_eq!(
            ForwardError::Timeout(Elapsed(std::time::Duration::from_secs(10))).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ForwardError::TooLarge { limit: 1 }.kind(),
            ErrorKind::Upstream
        );
    }

    #[test]
    fn encode_failure_is_not_a_configuration_error() {
        let err = ForwardError::from(serde_json::Error::io(std::io::Error::other("boom")));
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn missing_key_message_names_variable() {
        assert_eq!(WeatherError::MissingApiKey.to_string(), "WEATHER_API_KEY not set");
    }
}
