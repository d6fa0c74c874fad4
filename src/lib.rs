//! Stock bridge library.
//!
//! An HTTP service that answers each data request by running an external
//! worker process and translating its output or failure into a response.

pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use bridge::{InvocationSpec, ProcessBridge};
pub use config::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
