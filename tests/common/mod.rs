//! Shared utilities for integration tests.
//!
//! Workers are small `sh` scripts written into a temp directory and run
//! through `sh` as the interpreter, so no executable bits are needed.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use stock_bridge::config::BridgeConfig;
use stock_bridge::http::HttpServer;
use stock_bridge::lifecycle::Shutdown;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A running server plus the directory its workers live in.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub workers: WorkerDir,
    pub shutdown: Shutdown,
    pub handle: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body and return status plus decoded JSON response.
    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("server unreachable");
        let status = res.status().as_u16();
        let json = res.json().await.expect("response is not JSON");
        (status, json)
    }

    /// POST a raw body with no content type.
    pub async fn post_raw(&self, path: &str, body: &'static str) -> (u16, Value) {
        let res = self
            .client
            .post(self.url(path))
            .body(body)
            .send()
            .await
            .expect("server unreachable");
        let status = res.status().as_u16();
        let json = res.json().await.expect("response is not JSON");
        (status, json)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Temp directory holding worker scripts and anything they write.
pub struct WorkerDir {
    dir: TempDir,
}

impl WorkerDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the worker directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a worker script and return its path.
    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write worker script");
        path
    }
}

/// Config whose workers point at `quote.sh`, `filings.sh`, `chart.sh` and
/// `news.sh` inside `workers`, run through `sh`.
pub fn test_config(workers: &WorkerDir) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.static_dir = None;
    config.workers.interpreter = Some("sh".to_string());
    config.workers.quote = workers.file("quote.sh");
    config.workers.filings = workers.file("filings.sh");
    config.workers.chart = workers.file("chart.sh");
    config.workers.news = workers.file("news.sh");
    config.limits.max_concurrent_workers = 8;
    config.limits.worker_timeout_secs = 10;
    config.news.api_key = Some("test-key".to_string());
    config
}

/// Start a server on an ephemeral port.
pub async fn spawn_app(config: BridgeConfig, workers: WorkerDir) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("build client");

    TestApp {
        addr,
        client,
        workers,
        shutdown,
        handle: Some(handle),
    }
}

/// Write the named scripts and start a server with the default test config.
pub async fn spawn_with_workers(scripts: &[(&str, &str)]) -> TestApp {
    let workers = WorkerDir::new();
    for (name, body) in scripts {
        workers.write(name, body);
    }
    let config = test_config(&workers);
    spawn_app(config, workers).await
}
