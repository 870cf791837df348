//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the Zipkin-exporting tracer provider
//! - Extract trace context from incoming requests
//! - Propagate trace context to the downstream service

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::ObservabilityConfig;

/// W3C Trace Context header name.
pub const TRACEPARENT: &str = "traceparent";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build Zipkin exporter: {0}")]
    Exporter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to flush spans: {0}")]
    Shutdown(String),
}

/// Owns the tracer provider for the lifetime of the process.
///
/// Spans are batched; call [`TracerGuard::shutdown`] before exit so the last
/// batch reaches the collector.
#[derive(Default)]
pub struct TracerGuard {
    provider: Option<SdkTracerProvider>,
}

impl TracerGuard {
    /// A guard that exports nothing.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Build a batching provider exporting to the configured Zipkin endpoint.
    pub fn zipkin(service_name: &'static str, config: &ObservabilityConfig) -> Result<Self, TelemetryError> {
        if !config.tracing_enabled {
            return Ok(Self::disabled());
        }

        let exporter = opentelemetry_zipkin::ZipkinExporter::builder()
            .with_collector_endpoint(config.zipkin_endpoint.clone())
            .build()
            .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(Resource::builder().with_service_name(service_name).build())
            .build();

        Ok(Self {
            provider: Some(provider),
        })
    }

    pub fn provider(&self) -> Option<&SdkTracerProvider> {
        self.provider.as_ref()
    }

    /// Flush pending spans and stop the exporter.
    pub fn shutdown(self) -> Result<(), TelemetryError> {
        match self.provider {
            Some(provider) => provider
                .shutdown()
                .map_err(|e| TelemetryError::Shutdown(e.to_string())),
            None => Ok(()),
        }
    }
}

/// Adapter for extracting W3C Trace Context from HTTP headers.
struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Adapter for injecting W3C Trace Context into HTTP headers.
struct HeadersInjector<'a>(&'a mut HeaderMap);

impl Injector for HeadersInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, val);
        }
    }
}

/// Trace-context propagation handle carried in each service's state.
#[derive(Debug, Clone, Default)]
pub struct TracePropagation {
    propagator: TraceContextPropagator,
}

impl TracePropagation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the context of `span` into outgoing request headers.
    ///
    /// Writes nothing when no OpenTelemetry layer is installed.
    pub fn inject(&self, span: &Span, headers: &mut HeaderMap) {
        let cx = span.context();
        self.propagator
            .inject_context(&cx, &mut HeadersInjector(headers));
    }

    /// Make the caller's trace (if any) the parent of `span`.
    pub fn adopt_parent(&self, span: &Span, headers: &HeaderMap) {
        if headers.get(TRACEPARENT).is_none() {
            return;
        }
        let parent = self.propagator.extract(&HeadersExtractor(headers));
        let _ = span.set_parent(parent);
    }
}

/// Trace ID portion of a W3C `traceparent` value ("00-{trace_id}-{span_id}-{flags}").
pub fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) if trace_id.len() == 32 => Some(trace_id),
        _ => None,
    }
}
