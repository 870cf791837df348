//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body decode)
//!     → entry.rs    (serviceA: validate → relay)
//!       resolver.rs (serviceB: validate → directory → weather → compose)
//!     → response.rs (ApiError → status + {"message": ...})
//!     → Send to client
//! ```

pub mod entry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use request::{RequestIdGenerator, X_REQUEST_ID};
pub use response::{ApiError, Message};
pub use server::{HttpServer, ENTRY_SERVICE, RESOLVER_SERVICE};
