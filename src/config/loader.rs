//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{BridgeConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "STOCK_BRIDGE_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration for the server binary.
///
/// Reads `.env` if present, then the TOML file named by
/// [`CONFIG_PATH_VAR`] if set, then applies environment overrides.
pub fn load_from_env() -> Result<BridgeConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
        }
    }

    let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
        Some(path) => read_file(Path::new(&path))?,
        None => BridgeConfig::default(),
    };

    apply_env(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers can inject values.
pub fn apply_env<F>(config: &mut BridgeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = parse_var("PORT", &port)?;
    }
    if let Some(dir) = lookup("STATIC_DIR") {
        config.server.static_dir = if dir.is_empty() { None } else { Some(dir.into()) };
    }

    if let Some(interpreter) = lookup("WORKER_INTERPRETER") {
        config.workers.interpreter = if interpreter.is_empty() {
            None
        } else {
            Some(interpreter)
        };
    }
    if let Some(secs) = lookup("WORKER_TIMEOUT_SECS") {
        config.limits.worker_timeout_secs = parse_var("WORKER_TIMEOUT_SECS", &secs)?;
    }
    if let Some(max) = lookup("MAX_CONCURRENT_WORKERS") {
        config.limits.max_concurrent_workers = parse_var("MAX_CONCURRENT_WORKERS", &max)?;
    }

    if let Some(key) = lookup("NEWS_API_KEY") {
        config.news.api_key = Some(key);
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(ConfigError::Env {
                    var: "LOG_FORMAT",
                    message: format!("expected 'json' or 'pretty', got '{}'", other),
                })
            }
        };
    }

    Ok(())
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}
