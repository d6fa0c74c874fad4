//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer and process bridge produce:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (request/invocation counters, latency, workers in flight)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for aggregation)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP span into every worker log line
//! - Metrics go through the `metrics` facade; without an installed
//!   recorder they are no-ops, which keeps tests free of global setup

pub mod logging;
pub mod metrics;
