//! Resolution service (serviceB) handler.
//!
//! ```text
//! Received → Validated → CityResolved → TemperatureResolved → Composed
//! ```
//!
//! Each stage short-circuits on failure; there are no partial responses.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{Instrument, Span};

use crate::domain::{Cep, WeatherReport};
use crate::http::request::decode_cep_request;
use crate::http::response::ApiError;
use crate::observability::TracePropagation;
use crate::upstream::{DirectoryClient, WeatherClient};

/// Application state injected into the resolver handler.
#[derive(Clone)]
pub struct ResolverState {
    pub directory: Arc<DirectoryClient>,
    pub weather: Arc<WeatherClient>,
    pub propagation: TracePropagation,
}

pub async fn cep_handler(
    State(state): State<ResolverState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = tracing::info_span!(
        "cep_handler",
        service = "service-b",
        otel.kind = "server",
        cep = tracing::field::Empty,
    );
    state.propagation.adopt_parent(&span, &headers);

    async move { resolve(&state, &body).await.into_response() }
        .instrument(span)
        .await
}

async fn resolve(state: &ResolverState, body: &Bytes) -> Result<Json<WeatherReport>, ApiError> {
    let request = decode_cep_request(body)?;
    Span::current().record("cep", request.cep.as_str());

    let cep = Cep::try_from(&request)?;
    let city = state.directory.city_for(&cep).await?;
    let celsius = state.weather.current_celsius(&city).await?;

    tracing::debug!(%city, celsius, "Resolved temperature");
    Ok(Json(WeatherReport::compose(city, celsius)))
}
