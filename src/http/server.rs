//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for either service
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve on a listener until the shutdown channel fires

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{EntryConfig, ResolverConfig, TimeoutConfig};
use crate::http::entry::{self, EntryState};
use crate::http::request::{RequestIdGenerator, X_REQUEST_ID};
use crate::http::resolver::{self, ResolverState};
use crate::http::response::method_not_allowed;
use crate::observability::{metrics, TracePropagation};
use crate::upstream::{ClientBuildError, DirectoryClient, DownstreamClient, WeatherClient};

pub const ENTRY_SERVICE: &str = "service-a";
pub const RESOLVER_SERVICE: &str = "service-b";

/// HTTP server for one of the two services.
pub struct HttpServer {
    router: Router,
    service: &'static str,
}

impl HttpServer {
    /// Entry service: validate, then relay to the resolution service.
    pub fn entry(config: &EntryConfig, propagation: TracePropagation) -> Result<Self, ClientBuildError> {
        let downstream = DownstreamClient::new(&config.downstream, &config.timeouts, propagation.clone())?;
        tracing::debug!(service_b_url = %downstream.url(), "Relay client ready");

        let state = EntryState {
            downstream: Arc::new(downstream),
            propagation,
        };
        let routes = Router::new()
            .route("/cep", post(entry::cep_handler).fallback(method_not_allowed))
            .with_state(state);

        Ok(Self {
            router: Self::with_middleware(routes, ENTRY_SERVICE, &config.timeouts),
            service: ENTRY_SERVICE,
        })
    }

    /// Resolution service: directory lookup, weather lookup, conversion.
    pub fn resolver(config: &ResolverConfig, propagation: TracePropagation) -> Result<Self, ClientBuildError> {
        let directory = DirectoryClient::new(&config.directory, &config.timeouts)?;
        let weather = WeatherClient::new(&config.weather, &config.timeouts)?;
        if !weather.has_api_key() {
            tracing::warn!("WEATHER_API_KEY is not set; every lookup will fail with 500");
        }

        let state = ResolverState {
            directory: Arc::new(directory),
            weather: Arc::new(weather),
            propagation,
        };
        let routes = Router::new()
            .route("/cep", post(resolver::cep_handler).fallback(method_not_allowed))
            .with_state(state);

        Ok(Self {
            router: Self::with_middleware(routes, RESOLVER_SERVICE, &config.timeouts),
            service: RESOLVER_SERVICE,
        })
    }

    /// Wrap routes with the shared middleware stack. Outermost layer last.
    #[allow(deprecated)]
    fn with_middleware(routes: Router, service: &'static str, timeouts: &TimeoutConfig) -> Router {
        routes
            .layer(middleware::from_fn_with_state(service, track_requests))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TimeoutLayer::new(timeouts.request()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, RequestIdGenerator))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = self.service,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(service = self.service, "HTTP server stopped");
        Ok(())
    }
}

async fn track_requests(State(service): State<&'static str>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_request(service, method.as_str(), response.status().as_u16(), start);
    response
}
