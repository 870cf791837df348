//! Startup orchestration.
//!
//! Subsystems initialize in order: tracer and subscriber first so every
//! later step is logged, the listener last so traffic only arrives when
//! the service is ready.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, EntryConfig, ListenerConfig, ObservabilityConfig, ResolverConfig};
use crate::http::{HttpServer, ENTRY_SERVICE, RESOLVER_SERVICE};
use crate::lifecycle::Shutdown;
use crate::observability::{logging, metrics, TelemetryError, TracePropagation, TracerGuard};
use crate::upstream::ClientBuildError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("client: {0}")]
    Client(#[from] ClientBuildError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the entry service until SIGINT/SIGTERM.
pub async fn run_entry(config: EntryConfig) -> Result<(), StartupError> {
    let tracer = build_tracer(ENTRY_SERVICE, &config.observability).await?;
    logging::init(ENTRY_SERVICE, &config.observability, &tracer)?;

    tracing::info!(
        port = config.listener.port,
        service_b_url = %config.downstream.url,
        zipkin_endpoint = %config.observability.zipkin_endpoint,
        outbound_timeout_secs = config.timeouts.outbound_secs,
        "Configuration loaded"
    );

    let server = HttpServer::entry(&config, TracePropagation::new())?;
    serve(server, &config.listener, &config.observability, tracer).await
}

/// Run the resolution service until SIGINT/SIGTERM.
pub async fn run_resolver(config: ResolverConfig) -> Result<(), StartupError> {
    let tracer = build_tracer(RESOLVER_SERVICE, &config.observability).await?;
    logging::init(RESOLVER_SERVICE, &config.observability, &tracer)?;

    tracing::info!(
        port = config.listener.port,
        directory = %config.directory.base_url,
        weather = %config.weather.base_url,
        weather_api_key_set = config.weather.api_key().is_some(),
        zipkin_endpoint = %config.observability.zipkin_endpoint,
        outbound_timeout_secs = config.timeouts.outbound_secs,
        "Configuration loaded"
    );

    let server = HttpServer::resolver(&config, TracePropagation::new())?;
    serve(server, &config.listener, &config.observability, tracer).await
}

async fn build_tracer(
    service: &'static str,
    observability: &ObservabilityConfig,
) -> Result<TracerGuard, StartupError> {
    let observability = observability.clone();
    // The exporter's blocking HTTP client must not be built on a runtime worker.
    let tracer = tokio::task::spawn_blocking(move || TracerGuard::zipkin(service, &observability))
        .await
        .map_err(|e| TelemetryError::Exporter(e.to_string()))??;
    Ok(tracer)
}

async fn serve(
    server: HttpServer,
    listener: &ListenerConfig,
    observability: &ObservabilityConfig,
    tracer: TracerGuard,
) -> Result<(), StartupError> {
    let listener = TcpListener::bind(listener.bind_address()).await?;
    tracing::info!(
        service = server.service(),
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    if observability.metrics_enabled {
        match observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let signal_task = shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;
    signal_task.abort();

    // The batch exporter blocks while flushing.
    tokio::task::spawn_blocking(move || tracer.shutdown())
        .await
        .map_err(|e| TelemetryError::Shutdown(e.to_string()))??;

    tracing::info!("Shutdown complete");
    Ok(())
}
