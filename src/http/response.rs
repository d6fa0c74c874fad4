//! Response bodies.
//!
//! Every body carries `success`. Failures add `error` and, when there is
//! something more specific to say, `details`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure body shared by all routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

/// Success body of the pass-through routes: worker stdout, verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPayload {
    pub success: bool,
    pub data: String,
}

impl TextPayload {
    pub fn new(data: String) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// News route body. Always sent with status 200.
///
/// Articles are the worker's JSON objects exactly as it emitted them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub articles: Vec<Value>,
}

impl NewsPayload {
    pub fn articles(articles: Vec<Value>) -> Self {
        Self {
            success: true,
            error: None,
            details: None,
            articles,
        }
    }

    /// Empty result carrying the reason the fetch failed.
    pub fn degraded(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            details,
            articles: Vec::new(),
        }
    }
}
