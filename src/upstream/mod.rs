//! Outbound HTTP clients.
//!
//! # Data Flow
//! ```text
//! serviceA:
//!     downstream.rs → POST {SERVICE_B_URL} (trace context + request ID)
//!
//! serviceB:
//!     directory.rs  → GET {directory}/ws/{cep}/json/   → city name
//!     weather.rs    → GET {weather}/v1/current.json    → °C
//! ```
//!
//! # Design Decisions
//! - One client per target, built once at startup and shared
//! - Each client owns its timeout; no call is retried
//! - Every failure is a tagged error exposing an `ErrorKind`

pub mod directory;
pub mod downstream;
pub mod types;
pub mod weather;

pub use directory::DirectoryClient;
pub use downstream::{DownstreamClient, Relayed};
pub use types::{ClientBuildError, DirectoryError, ErrorKind, ForwardError, WeatherError};
pub use weather::WeatherClient;
