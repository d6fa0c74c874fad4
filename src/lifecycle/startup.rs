//! Startup orchestration.
//!
//! Order: metrics exporter, configuration warnings, listener bind, serve.
//! Any failure before serving is fatal.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::BridgeConfig;
use crate::http::{news, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the service up and serve until `shutdown` is triggered.
pub async fn start(config: BridgeConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    if config.news.api_key().is_none() {
        tracing::warn!(
            setting = news::API_KEY_SETTING,
            "News API key is not configured; news requests will return no articles"
        );
    }

    for (route, entry) in config.workers.entries() {
        tracing::debug!(
            route,
            entry = %entry.display(),
            interpreter = ?config.workers.interpreter,
            "Worker registered"
        );
    }

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let server = HttpServer::new(config);
    if !server.serves_static() {
        tracing::info!("No static asset directory found; serving API routes only");
    }

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
