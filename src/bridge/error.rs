//! Bridge error definitions.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while running a worker process.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The executable could not be started (not found, permission denied, ...).
    #[error("failed to start worker: {0}")]
    Launch(#[source] std::io::Error),

    /// The worker ran and finished unsuccessfully.
    ///
    /// `details` is the captured stderr, or a generated message when the
    /// worker wrote nothing there.
    #[error("worker failed: {details}")]
    Exited { code: Option<i32>, details: String },

    /// The worker did not finish before the deadline and was killed.
    #[error("worker did not finish within {}s", .after.as_secs_f64())]
    TimedOut { after: Duration },

    /// Pipe I/O with a running worker failed.
    #[error("worker I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bridge no longer admits invocations.
    #[error("process bridge is shut down")]
    Unavailable,
}

impl BridgeError {
    /// Text suitable for the `details` field of an error response.
    pub fn details(&self) -> String {
        match self {
            BridgeError::Exited { details, .. } => details.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
