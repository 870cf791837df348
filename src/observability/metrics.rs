//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): inbound requests by service, method, status
//! - `http_request_duration_seconds` (histogram): inbound latency by service
//! - `outbound_requests_total` (counter): external calls by target and outcome
//! - `outbound_request_duration_seconds` (histogram): external call latency by target
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_request(service: &'static str, method: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "service" => service,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Outcome label for an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

pub fn record_outbound(target: &'static str, outcome: Outcome, start: Instant) {
    counter!(
        "outbound_requests_total",
        "target" => target,
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!("outbound_request_duration_seconds", "target" => target)
        .record(start.elapsed().as_secs_f64());
}
