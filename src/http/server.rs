//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, CORS, metrics)
//! - Serve static frontend assets as the fallback
//! - Bind server to listener and stop on the shutdown signal

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::bridge::ProcessBridge;
use crate::config::{BridgeConfig, NewsConfig, WorkersConfig};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::{chart, filings, health, news, quote};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::security::{headers, limits};

/// Application state injected into handlers.
///
/// Built once from the configuration; handlers never read the environment.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<ProcessBridge>,
    pub workers: Arc<WorkersConfig>,
    pub news: Arc<NewsConfig>,
}

impl AppState {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            bridge: Arc::new(ProcessBridge::new(&config.limits)),
            workers: Arc::new(config.workers.clone()),
            news: Arc::new(config.news.clone()),
        }
    }
}

/// HTTP server for the stock bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
    bridge: Arc<ProcessBridge>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BridgeConfig) -> Self {
        let state = AppState::from_config(&config);
        let bridge = state.bridge.clone();
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            bridge,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: CORS, nosniff header, request ID,
    /// tracing span, request ID propagation, body limit, metrics.
    fn build_router(config: &BridgeConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health::health))
            .route("/quote", post(quote::fetch_quote))
            .route("/filings", post(filings::fetch_filings))
            .route("/chart", post(chart::fetch_chart))
            .route("/news", post(news::fetch_news))
            .with_state(state);

        if let Some(dir) = config.server.static_dir.as_deref().filter(|d| d.is_dir()) {
            tracing::info!(dir = %dir.display(), "Serving static assets");
            router = router.fallback_service(ServeDir::new(dir));
        }

        let router = router
            .layer(middleware::from_fn(track_metrics))
            .layer(limits::body_limit_layer(&config.security))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(headers::nosniff_layer());

        if config.security.permissive_cors {
            router.layer(headers::cors_layer())
        } else {
            router
        }
    }

    /// A handle to the configured router, for driving it without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires.
    ///
    /// In-flight requests are allowed to finish; requests still queued for
    /// a worker slot at that point are answered with 503.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_workers = self.config.limits.max_concurrent_workers,
            worker_timeout_secs = self.config.limits.worker_timeout_secs,
            "HTTP server starting"
        );

        let bridge = self.bridge;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown::wait(shutdown_rx).await;
                bridge.close();
                tracing::info!("Shutdown signal received, no longer accepting connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Whether the configured static directory exists and is being served.
    pub fn serves_static(&self) -> bool {
        self.config
            .server
            .static_dir
            .as_deref()
            .is_some_and(Path::is_dir)
    }
}

fn request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16(), start);
    response
}
