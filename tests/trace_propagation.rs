//! Trace instrumentation across the two services, captured with an
//! in-memory span exporter.

use axum::http::StatusCode;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cep_weather::config::{EntryConfig, ResolverConfig};
use cep_weather::lifecycle::Shutdown;
use cep_weather::observability::tracing::{parse_trace_id, TRACEPARENT};
use cep_weather::observability::TracePropagation;
use cep_weather::HttpServer;

mod common;

const HANDLER: &str = "cep_handler";
const FORWARD: &str = "forward_to_service_b";
const CITY: &str = "get_city_by_cep";
const TEMPERATURE: &str = "get_temperature";

struct Telemetry {
    _provider: SdkTracerProvider,
    exporter: InMemorySpanExporter,
}

/// Process-wide subscriber shared by every test in this file. Tests tell
/// their spans apart by trace ID.
fn exporter() -> &'static InMemorySpanExporter {
    static TELEMETRY: OnceLock<Telemetry> = OnceLock::new();
    let telemetry = TELEMETRY.get_or_init(|| {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("cep-weather-test")))
            .try_init()
            .expect("install test subscriber");
        Telemetry {
            _provider: provider,
            exporter,
        }
    });
    &telemetry.exporter
}

fn is_named(span: &SpanData) -> bool {
    [HANDLER, FORWARD, CITY, TEMPERATURE].contains(&&*span.name)
}

/// Wait until `expected` named spans of `trace_id` have been exported.
async fn finished_spans(trace_id: &str, expected: usize) -> Vec<SpanData> {
    let mut spans = Vec::new();
    for _ in 0..100 {
        spans = exporter()
            .get_finished_spans()
            .unwrap()
            .into_iter()
            .filter(|s| s.span_context.trace_id().to_string() == trace_id && is_named(s))
            .collect();
        if spans.len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    spans
}

fn named<'a>(spans: &'a [SpanData], name: &str) -> Vec<&'a SpanData> {
    spans.iter().filter(|s| s.name == name).collect()
}

fn attribute(span: &SpanData, key: &str) -> Option<String> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.to_string())
}

fn entry_config(service_b_url: String) -> EntryConfig {
    let mut config = EntryConfig::default();
    config.downstream.url = service_b_url;
    config
}

#[tokio::test]
async fn relay_carries_traceparent_of_forward_span() {
    exporter();
    let service_b = common::start_fixed_backend(200, r#"{"ok":true}"#).await;

    let shutdown = Shutdown::new();
    let server = HttpServer::entry(
        &entry_config(format!("{}/cep", service_b.base_url())),
        TracePropagation::new(),
    )
    .unwrap();
    let addr = common::spawn_server(server, &shutdown).await;

    let res = common::client()
        .post(format!("http://{}/cep", addr))
        .body(r#"{"cep":"01310930"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let forwarded = service_b.requests();
    let traceparent = forwarded[0]
        .header(TRACEPARENT)
        .expect("relayed request carries traceparent")
        .to_string();
    let trace_id = parse_trace_id(&traceparent).expect("well-formed traceparent");

    let spans = finished_spans(trace_id, 2).await;
    let forward = named(&spans, FORWARD);
    assert_eq!(forward.len(), 1);
    assert_eq!(named(&spans, HANDLER).len(), 1);

    // The header's parent-id is the forward span itself.
    let parent_id = traceparent.split('-').nth(2).unwrap();
    assert_eq!(forward[0].span_context.span_id().to_string(), parent_id);
    assert_eq!(
        attribute(forward[0], "service_b.url").as_deref(),
        Some(format!("{}/cep", service_b.base_url()).as_str())
    );

    shutdown.trigger();
}

#[tokio::test]
async fn full_chain_shares_one_trace() {
    const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
    exporter();

    let directory = common::start_fixed_backend(200, r#"{"localidade":"São Paulo"}"#).await;
    let weather = common::start_fixed_backend(200, r#"{"current":{"temp_c":25.0}}"#).await;

    let mut resolver_config = ResolverConfig::default();
    resolver_config.directory.base_url = directory.base_url();
    resolver_config.weather.base_url = weather.base_url();
    resolver_config.weather.api_key = Some("k".into());

    let shutdown = Shutdown::new();
    let resolver = HttpServer::resolver(&resolver_config, TracePropagation::new()).unwrap();
    let resolver_addr = common::spawn_server(resolver, &shutdown).await;
    let entry = HttpServer::entry(
        &entry_config(format!("http://{}/cep", resolver_addr)),
        TracePropagation::new(),
    )
    .unwrap();
    let entry_addr = common::spawn_server(entry, &shutdown).await;

    let res = common::client()
        .post(format!("http://{}/cep", entry_addr))
        .header(TRACEPARENT, format!("00-{TRACE_ID}-00f067aa0ba902b7-01"))
        .body(r#"{"cep":"01310930"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let spans = finished_spans(TRACE_ID, 5).await;
    let handlers = named(&spans, HANDLER);
    let forward = named(&spans, FORWARD);
    assert_eq!(handlers.len(), 2, "one handler span per service");
    assert_eq!(forward.len(), 1);
    assert_eq!(named(&spans, CITY).len(), 1);
    assert_eq!(named(&spans, TEMPERATURE).len(), 1);

    let resolver_handler = handlers
        .iter()
        .find(|s| attribute(s, "service").as_deref() == Some("service-b"))
        .expect("service-b handler span");
    // Service B adopted the context injected by the relay.
    assert_eq!(
        resolver_handler.parent_span_id,
        forward[0].span_context.span_id()
    );

    let entry_handler = handlers
        .iter()
        .find(|s| attribute(s, "service").as_deref() == Some("service-a"))
        .expect("service-a handler span");
    assert_eq!(entry_handler.parent_span_id.to_string(), "00f067aa0ba902b7");

    assert_eq!(weather.hits(), 1);
    shutdown.trigger();
}
