//! CEP weather services.
//!
//! Two small HTTP services forming a request chain:
//!
//! ```text
//!   client ──POST /cep──▶ service-a ──POST /cep──▶ service-b ──▶ directory API (CEP → city)
//!                          (validate,               (validate,  ──▶ weather API  (city → °C)
//!                           relay verbatim)           compose)
//! ```
//!
//! service-a checks the 8-digit format and relays to service-b, returning
//! service-b's status and body unchanged. service-b resolves the city,
//! fetches the current temperature and answers
//! `{"city", "temp_C", "temp_F", "temp_K"}`. Both services emit spans around
//! every outbound call and propagate W3C trace context across the hop.

// Core subsystems
pub mod config;
pub mod domain;
pub mod http;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{EntryConfig, ResolverConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
