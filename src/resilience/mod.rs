//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call (directory, weather, downstream relay):
//!     → timeouts.rs (bounded by the outbound timeout)
//!     → on expiry: typed timeout error, surfaced as an internal error
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Nothing is retried: every failure is terminal for its request
//! - Cancellation is structural: dropping the handler future drops every
//!   outbound future it owns

pub mod timeouts;
