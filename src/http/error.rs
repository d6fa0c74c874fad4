//! HTTP error mapping.
//!
//! Maps request validation, configuration and worker failures onto status
//! codes and the shared [`ErrorBody`] shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::bridge::BridgeError;
use crate::http::response::ErrorBody;

/// Failure of a route, before or after the worker ran.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required ticker missing or blank.
    #[error("Ticker is required")]
    MissingTicker,

    /// Body is not the expected JSON object.
    #[error("Invalid request body")]
    InvalidBody(String),

    /// A required setting is absent.
    #[error("{setting} is not configured")]
    Configuration { setting: &'static str },

    /// The worker could not be started.
    #[error("{context}")]
    Launch {
        context: &'static str,
        source: BridgeError,
    },

    /// The worker ran and failed, or its pipes broke.
    #[error("{context}")]
    Execution {
        context: &'static str,
        source: BridgeError,
    },

    /// The worker missed its deadline and was killed.
    #[error("Worker timed out")]
    Timeout {
        context: &'static str,
        source: BridgeError,
    },

    /// The server is shutting down and no longer runs workers.
    #[error("Service is shutting down")]
    Unavailable {
        context: &'static str,
        source: BridgeError,
    },

    /// Worker output was not the structured data expected.
    #[error("{context}")]
    Parse {
        context: &'static str,
        details: String,
    },

    /// The worker exited cleanly but reported its own failure.
    #[error("{context}")]
    WorkerReported {
        context: &'static str,
        details: String,
    },
}

impl ApiError {
    /// Classify a bridge failure. `context` names what the route was doing.
    pub fn from_bridge(context: &'static str, source: BridgeError) -> Self {
        match source {
            BridgeError::Launch(_) => ApiError::Launch { context, source },
            BridgeError::TimedOut { .. } => ApiError::Timeout { context, source },
            BridgeError::Unavailable => ApiError::Unavailable { context, source },
            _ => ApiError::Execution { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingTicker | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Configuration { .. }
            | ApiError::Launch { .. }
            | ApiError::Execution { .. }
            | ApiError::Parse { .. }
            | ApiError::WorkerReported { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text for the `details` field, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            ApiError::MissingTicker => None,
            ApiError::Configuration { setting } => Some(format!(
                "set {} in the environment or the config file",
                setting
            )),
            ApiError::InvalidBody(details)
            | ApiError::Parse { details, .. }
            | ApiError::WorkerReported { details, .. } => Some(details.clone()),
            ApiError::Launch { source, .. }
            | ApiError::Execution { source, .. }
            | ApiError::Timeout { source, .. }
            | ApiError::Unavailable { source, .. } => Some(source.details()),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string(), self.details())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, details = ?self.details(), "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}
