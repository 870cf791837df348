//! Brazilian postal code (CEP) format validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a CEP.
pub const CEP_LEN: usize = 8;

/// Inbound payload accepted by both services.
///
/// A body without a `cep` field decodes to an empty code, which then fails
/// format validation rather than decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

impl CepRequest {
    pub fn new(cep: impl Into<String>) -> Self {
        Self { cep: cep.into() }
    }
}

/// Returned when a string is not exactly eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid zipcode: {0:?}")]
pub struct InvalidCep(pub String);

/// A postal code known to be exactly eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Validate `raw` without any normalization (no trimming, no dash removal).
    pub fn parse(raw: &str) -> Result<Self, InvalidCep> {
        if is_valid_cep(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidCep(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&CepRequest> for Cep {
    type Error = InvalidCep;

    fn try_from(req: &CepRequest) -> Result<Self, Self::Error> {
        Cep::parse(&req.cep)
    }
}

/// True iff `raw` is exactly eight ASCII decimal digits.
///
/// Unicode digits (e.g. Arabic-Indic) are rejected.
pub fn is_valid_cep(raw: &str) -> bool {
    raw.len() == CEP_LEN && raw.bytes().all(|b| b.is_ascii_digit())
}
