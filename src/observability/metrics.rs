//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): requests by route, status
//! - `bridge_request_duration_seconds` (histogram): handler latency by route
//! - `bridge_invocations_total` (counter): worker runs by outcome
//! - `bridge_invocation_duration_seconds` (histogram): worker wall time
//! - `bridge_workers_in_flight` (gauge): live worker processes

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "bridge_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("bridge_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished worker invocation.
pub fn record_invocation(outcome: &'static str, elapsed: Duration) {
    counter!("bridge_invocations_total", "outcome" => outcome).increment(1);
    histogram!("bridge_invocation_duration_seconds").record(elapsed.as_secs_f64());
}

/// Counts a live worker process in `bridge_workers_in_flight` until dropped.
#[derive(Debug)]
pub struct WorkerGuard(());

impl WorkerGuard {
    pub fn new() -> Self {
        gauge!("bridge_workers_in_flight").increment(1.0);
        Self(())
    }
}

impl Default for WorkerGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        gauge!("bridge_workers_in_flight").decrement(1.0);
    }
}
