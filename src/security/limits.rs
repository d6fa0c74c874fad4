//! Request size limits.
//!
//! Bodies larger than the configured limit are rejected with
//! 413 Payload Too Large before a handler sees them.

use tower_http::limit::RequestBodyLimitLayer;

use crate::config::SecurityConfig;

/// Body limit layer for the configured maximum.
pub fn body_limit_layer(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}
