//! Relay client: entry service → resolution service.
//!
//! The downstream answer is buffered and handed back untouched so the caller
//! can relay status and body verbatim. Both `http` and `https` targets work.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use reqwest::Url;
use std::time::{Duration, Instant};
use tracing::Span;

use crate::config::{DownstreamConfig, TimeoutConfig};
use crate::domain::CepRequest;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics::{self, Outcome};
use crate::observability::TracePropagation;
use crate::resilience::timeouts;
use crate::upstream::types::{ClientBuildError, ForwardError};

const TARGET: &str = "service_b";

/// Largest downstream body the relay will buffer.
pub const MAX_RELAY_BODY: usize = 2 * 1024 * 1024;

/// Downstream status and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
    propagation: TracePropagation,
}

impl DownstreamClient {
    pub fn new(
        config: &DownstreamConfig,
        timeouts: &TimeoutConfig,
        propagation: TracePropagation,
    ) -> Result<Self, ClientBuildError> {
        let url = Url::parse(&config.url).map_err(|e| ClientBuildError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        // The whole exchange is bounded in `forward`, body included.
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            url,
            timeout: timeouts.outbound(),
            propagation,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST `request` to the resolution service and buffer its answer.
    ///
    /// The current trace context and `request_id` travel with the request.
    #[tracing::instrument(
        name = "forward_to_service_b",
        skip_all,
        fields(service_b.url = %self.url, otel.kind = "client")
    )]
    pub async fn forward(
        &self,
        request: &CepRequest,
        request_id: Option<&HeaderValue>,
    ) -> Result<Relayed, ForwardError> {
        let payload = serde_json::to_vec(request)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(id) = request_id {
            headers.insert(X_REQUEST_ID, id.clone());
        }
        self.propagation.inject(&Span::current(), &mut headers);

        let start = Instant::now();
        let result = match timeouts::bounded(self.timeout, self.exchange(headers, payload)).await {
            Ok(result) => result,
            Err(elapsed) => Err(ForwardError::from(elapsed)),
        };
        metrics::record_outbound(TARGET, Outcome::of(&result), start);

        match &result {
            Ok(relayed) => tracing::debug!(status = %relayed.status, bytes = relayed.body.len(), "Service B answered"),
            Err(e) => tracing::error!(error = %e, "Relay to service B failed"),
        }
        result
    }

    async fn exchange(&self, headers: HeaderMap, payload: Vec<u8>) -> Result<Relayed, ForwardError> {
        let mut response = self
            .http
            .post(self.url.clone())
            .headers(headers)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > MAX_RELAY_BODY {
                return Err(ForwardError::TooLarge {
                    limit: MAX_RELAY_BODY,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Relayed {
            status,
            body: Bytes::from(body),
        })
    }
}
