//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bridge::WorkerCommand;

/// Root configuration for the stock bridge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener and static asset settings.
    pub server: ServerConfig,

    /// Worker programs launched per request.
    pub workers: WorkersConfig,

    /// Worker deadline and concurrency bound.
    pub limits: LimitsConfig,

    /// News provider settings.
    pub news: NewsConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Directory holding the frontend entry point. Served as the
    /// router fallback when it exists.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// `host:port` as a bind address string.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: Some(PathBuf::from("public")),
        }
    }
}

/// Worker program definitions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Interpreter for the worker entry points. `None` executes them directly.
    pub interpreter: Option<String>,

    /// Quote fetcher; receives the ticker as its only argument.
    pub quote: PathBuf,

    /// Filings fetcher; receives the ticker on stdin.
    pub filings: PathBuf,

    /// Chart-series fetcher; receives ticker, interval and period arguments.
    pub chart: PathBuf,

    /// News fetcher; receives one JSON request line on stdin.
    pub news: PathBuf,
}

impl WorkersConfig {
    /// Resolve an entry point into a runnable command.
    pub fn command(&self, entry: &Path) -> WorkerCommand {
        WorkerCommand {
            interpreter: self.interpreter.clone(),
            entry: entry.to_path_buf(),
        }
    }

    /// All entry points with their route names, for validation and logging.
    pub fn entries(&self) -> [(&'static str, &PathBuf); 4] {
        [
            ("quote", &self.quote),
            ("filings", &self.filings),
            ("chart", &self.chart),
            ("news", &self.news),
        ]
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            interpreter: Some("python3".to_string()),
            quote: PathBuf::from("main.py"),
            filings: PathBuf::from("sec_data_fetcher.py"),
            chart: PathBuf::from("chart_data_fetcher.py"),
            news: PathBuf::from("news_fetcher.py"),
        }
    }
}

/// Worker resource limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum simultaneous worker processes; further invocations queue.
    pub max_concurrent_workers: usize,

    /// Deadline for a single worker in seconds.
    pub worker_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_workers: 16,
            worker_timeout_secs: 30,
        }
    }
}

/// News provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Provider API key. Absence disables the news route's fetches.
    pub api_key: Option<String>,

    /// Articles requested per fetch.
    pub article_limit: u32,
}

impl NewsConfig {
    /// The API key, if set to something non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            article_limit: 10,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Allow cross-origin requests from any origin.
    pub permissive_cors: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
            permissive_cors: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
