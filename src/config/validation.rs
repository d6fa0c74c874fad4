//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that would otherwise
//! fail late (at bind time or on the first request). Every problem is
//! reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::config::schema::BridgeConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, returning every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::new("server.port", "must be non-zero"));
    } else if config.server.bind_address().parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.host",
            format!("'{}' is not a valid IP address", config.server.host),
        ));
    }

    if config.limits.max_concurrent_workers == 0 {
        errors.push(ValidationError::new(
            "limits.max_concurrent_workers",
            "must be at least 1",
        ));
    } else if config.limits.max_concurrent_workers > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::new(
            "limits.max_concurrent_workers",
            format!("must be at most {}", Semaphore::MAX_PERMITS),
        ));
    }

    if config.limits.worker_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "limits.worker_timeout_secs",
            "must be at least 1",
        ));
    }

    if config.news.article_limit == 0 {
        errors.push(ValidationError::new("news.article_limit", "must be at least 1"));
    }

    for (name, entry) in config.workers.entries() {
        if entry.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "workers",
                format!("{} worker entry point is empty", name),
            ));
        }
    }

    if let Some(interpreter) = &config.workers.interpreter {
        if interpreter.trim().is_empty() {
            errors.push(ValidationError::new(
                "workers.interpreter",
                "must not be blank; omit it to execute entry points directly",
            ));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be non-zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
