//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and upstream clients produce:
//!     → logging.rs (structured log events, subscriber setup)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (spans exported to Zipkin, W3C trace-context propagation)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → Zipkin collector
//! ```
//!
//! # Design Decisions
//! - One `tracing` span tree feeds both logs and exported traces
//! - The propagator is a value in service state, not a process global
//! - Request ID flows from the entry service to the resolution service

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{TelemetryError, TracePropagation, TracerGuard};
