//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (STOCK_BRIDGE_CONFIG)
//!     → .env + process environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → handed to HttpServer, which builds the bridge and route state
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and injected; handlers never read the environment
//! - All fields have defaults to allow minimal configs
//! - A missing news API key is a route-level condition, not a startup failure

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    BridgeConfig, LimitsConfig, LogFormat, NewsConfig, ObservabilityConfig, SecurityConfig,
    ServerConfig, WorkersConfig,
};
pub use validation::ValidationError;
