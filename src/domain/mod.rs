//! Request and response payloads shared by both services.
//!
//! # Data Flow
//! ```text
//! {"cep": "..."}
//!     → cep.rs (CepRequest decode, 8-digit format check)
//!     → [directory + weather lookups] (serviceB only)
//!     → temperature.rs (Celsius → Fahrenheit / Kelvin)
//!     → WeatherReport {"city", "temp_C", "temp_F", "temp_K"}
//! ```
//!
//! Everything here is pure: no I/O, no shared state.

pub mod cep;
pub mod temperature;

pub use cep::{is_valid_cep, Cep, CepRequest, InvalidCep};
pub use temperature::{Temperatures, WeatherReport};
