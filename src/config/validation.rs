//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected rather than stopping at the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{EntryConfig, ObservabilityConfig, ResolverConfig, TimeoutConfig};

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Semantic validation: `Config → Result<(), Vec<ValidationError>>`.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.to_string(),
            });
        }
    }
}

fn check_timeouts(timeouts: &TimeoutConfig, errors: &mut Vec<ValidationError>) {
    if timeouts.outbound_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.outbound_secs",
        });
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.request_secs",
        });
    }
}

fn check_observability(obs: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    if obs.tracing_enabled {
        check_url("observability.zipkin_endpoint", &obs.zipkin_endpoint, errors);
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: obs.metrics_address.clone(),
        });
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Validate for EntryConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_url("downstream.url", &self.downstream.url, &mut errors);
        check_timeouts(&self.timeouts, &mut errors);
        check_observability(&self.observability, &mut errors);
        finish(errors)
    }
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_url("directory.base_url", &self.directory.base_url, &mut errors);
        check_url("weather.base_url", &self.weather.base_url, &mut errors);
        check_timeouts(&self.timeouts, &mut errors);
        check_observability(&self.observability, &mut errors);
        finish(errors)
    }
}
