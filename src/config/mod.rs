//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides: PORT, SERVICE_B_URL, WEATHER_API_KEY, ... (loader.rs)
//!     → validation.rs (semantic checks)
//!     → EntryConfig / ResolverConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow running with no file at all
//! - A missing weather API key is a per-request failure, not a startup failure

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError, EnvOverrides, EnvSource, ProcessEnv};
pub use schema::{
    DirectoryConfig, DownstreamConfig, EntryConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, ResolverConfig, TimeoutConfig, WeatherConfig,
};
pub use validation::{Validate, ValidationError};
