//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Bridge spans into the OpenTelemetry tracer when one is configured
//!
//! `RUST_LOG` overrides the configured level.

use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::tracing::{TelemetryError, TracerGuard};

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("cep_weather={level},tower_http={level},warn")
}

pub fn init(
    service_name: &'static str,
    config: &ObservabilityConfig,
    tracer: &TracerGuard,
) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(true).boxed(),
    };

    let otel_layer = tracer
        .provider()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name)));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_scopes_crate_and_middleware() {
        assert_eq!(
            default_directive("debug"),
            "cep_weather=debug,tower_http=debug,warn"
        );
    }
}
