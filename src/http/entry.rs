//! Entry service (serviceA) handler.
//!
//! ```text
//! Received → Validated → Forwarded → Relayed
//!     └─ 400 / 405 / 422 short-circuit before any downstream call
//! ```

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{Instrument, Span};

use crate::domain::Cep;
use crate::http::request::{decode_cep_request, request_id};
use crate::http::response::ApiError;
use crate::observability::TracePropagation;
use crate::upstream::{DownstreamClient, ErrorKind};

/// Application state injected into the entry handler.
#[derive(Clone)]
pub struct EntryState {
    pub downstream: Arc<DownstreamClient>,
    pub propagation: TracePropagation,
}

pub async fn cep_handler(
    State(state): State<EntryState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = tracing::info_span!(
        "cep_handler",
        service = "service-a",
        otel.kind = "server",
        cep = tracing::field::Empty,
    );
    state.propagation.adopt_parent(&span, &headers);

    async move { relay(&state, &headers, &body).await.into_response() }
        .instrument(span)
        .await
}

async fn relay(state: &EntryState, headers: &HeaderMap, body: &Bytes) -> Result<Response, ApiError> {
    let request = decode_cep_request(body)?;
    Span::current().record("cep", request.cep.as_str());

    // Reject locally; a malformed code never reaches service B.
    Cep::try_from(&request)?;

    let relayed = state
        .downstream
        .forward(&request, request_id(headers))
        .await?;

    Response::builder()
        .status(relayed.status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(relayed.body))
        .map_err(|e| ApiError::internal(ErrorKind::Upstream, e))
}
