//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID, metrics)
//!     → request.rs (parse JSON body, require ticker)
//!     → quote.rs / filings.rs / chart.rs / news.rs (build InvocationSpec)
//!     → bridge::ProcessBridge (run worker)
//!     → handler interprets output (pass-through text or parsed JSON)
//!     → response.rs / error.rs (shape body and status)
//! ```
//!
//! # Design Decisions
//! - Validation happens before any worker is spawned
//! - Hard-fail routes map bridge failures to 500 (504 on deadline)
//! - The news route always answers 200; failures become an empty article list

pub mod chart;
pub mod error;
pub mod filings;
pub mod health;
pub mod news;
pub mod quote;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::{MakeRequestUuidV4, TickerRequest, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
