//! Postal directory client: CEP → city name.

use std::time::Instant;

use crate::config::{DirectoryConfig, TimeoutConfig};
use crate::domain::Cep;
use crate::observability::metrics::{self, Outcome};
use crate::upstream::types::{ClientBuildError, DirectoryError, DirectoryRecord};

const TARGET: &str = "directory";

/// Client for a ViaCEP-style directory (`/ws/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig, timeouts: &TimeoutConfig) -> Result<Self, ClientBuildError> {
        if config.accept_invalid_certs {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification disabled for directory lookups"
            );
        }
        let http = reqwest::Client::builder()
            .timeout(timeouts.outbound())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn lookup_url(&self, cep: &Cep) -> String {
        format!("{}/ws/{}/json/", self.base_url, cep)
    }

    /// Resolve `cep` to its city name.
    #[tracing::instrument(name = "get_city_by_cep", skip_all, fields(cep = %cep, otel.kind = "client"))]
    pub async fn city_for(&self, cep: &Cep) -> Result<String, DirectoryError> {
        let start = Instant::now();
        let result = self.fetch(cep).await;
        metrics::record_outbound(TARGET, Outcome::of(&result), start);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "Directory lookup failed");
        }
        result
    }

    async fn fetch(&self, cep: &Cep) -> Result<String, DirectoryError> {
        let response = self
            .http
            .get(self.lookup_url(cep))
            .send()
            .await
            .map_err(DirectoryError::Transport)?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Directory returned non-success status");
            return Err(DirectoryError::NotFound);
        }

        let record: DirectoryRecord = response.json().await.map_err(|e| {
            if e.is_decode() {
                DirectoryError::Decode(e)
            } else {
                DirectoryError::Transport(e)
            }
        })?;

        record.into_city().ok_or(DirectoryError::NotFound)
    }
}
