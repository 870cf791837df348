//! Configuration loading from disk and the process environment.
//!
//! Precedence, lowest first: built-in defaults, optional TOML file,
//! environment variables.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{EntryConfig, ObservabilityConfig, ResolverConfig, TimeoutConfig};
use crate::config::validation::{Validate, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Source of environment-style key lookups.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment. Empty values are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Applies environment variables on top of an already-built config.
pub trait EnvOverrides {
    fn apply_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError>;
}

fn parse_env<T: FromStr>(env: &dyn EnvSource, key: &'static str) -> Result<Option<T>, ConfigError> {
    match env.get(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        None => Ok(None),
    }
}

fn override_with<T: FromStr>(
    slot: &mut T,
    env: &dyn EnvSource,
    key: &'static str,
) -> Result<(), ConfigError> {
    if let Some(value) = parse_env(env, key)? {
        *slot = value;
    }
    Ok(())
}

impl EnvOverrides for TimeoutConfig {
    fn apply_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError> {
        override_with(&mut self.outbound_secs, env, "OUTBOUND_TIMEOUT_SECS")?;
        override_with(&mut self.request_secs, env, "REQUEST_TIMEOUT_SECS")
    }
}

impl EnvOverrides for ObservabilityConfig {
    fn apply_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError> {
        override_with(&mut self.log_level, env, "LOG_LEVEL")?;
        override_with(&mut self.log_format, env, "LOG_FORMAT")?;
        override_with(&mut self.tracing_enabled, env, "TRACING_ENABLED")?;
        override_with(&mut self.zipkin_endpoint, env, "ZIPKIN_ENDPOINT")?;
        override_with(&mut self.metrics_enabled, env, "METRICS_ENABLED")?;
        override_with(&mut self.metrics_address, env, "METRICS_ADDRESS")
    }
}

impl EnvOverrides for EntryConfig {
    fn apply_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError> {
        override_with(&mut self.listener.port, env, "PORT")?;
        override_with(&mut self.downstream.url, env, "SERVICE_B_URL")?;
        self.timeouts.apply_env(env)?;
        self.observability.apply_env(env)
    }
}

impl EnvOverrides for ResolverConfig {
    fn apply_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError> {
        override_with(&mut self.listener.port, env, "PORT")?;
        override_with(&mut self.directory.base_url, env, "DIRECTORY_BASE_URL")?;
        override_with(
            &mut self.directory.accept_invalid_certs,
            env,
            "DIRECTORY_ACCEPT_INVALID_CERTS",
        )?;
        override_with(&mut self.weather.base_url, env, "WEATHER_BASE_URL")?;
        if let Some(key) = env.get("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        self.timeouts.apply_env(env)?;
        self.observability.apply_env(env)
    }
}

/// Parse a TOML file without applying environment overrides or validation.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build, override and validate a configuration from an explicit env source.
pub fn load_config_with<T>(path: Option<&Path>, env: &dyn EnvSource) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default + EnvOverrides + Validate,
{
    let mut config: T = match path {
        Some(path) => read_file(path)?,
        None => T::default(),
    };
    config.apply_env(env)?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from an optional TOML file and the process environment.
pub fn load_config<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default + EnvOverrides + Validate,
{
    load_config_with(path, &ProcessEnv)
}
