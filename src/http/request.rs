//! Request parsing and identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Decode the JSON body shared by the data routes
//! - Enforce the required ticker before any worker is spawned

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Body accepted by the data routes. Each route reads the fields it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerRequest {
    pub ticker: Option<String>,
    pub interval: Option<String>,
    pub period: Option<String>,
    pub company_name: Option<String>,
}

impl TickerRequest {
    /// Decode a request body. An empty body is treated as `{}` so that it
    /// fails on the missing ticker rather than on the encoding.
    pub fn from_body(body: &Bytes) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }

    /// The trimmed ticker, or a validation error if it is absent or blank.
    pub fn ticker(&self) -> Result<&str, ApiError> {
        non_blank(self.ticker.as_deref()).ok_or(ApiError::MissingTicker)
    }

    pub fn interval(&self) -> Option<&str> {
        non_blank(self.interval.as_deref())
    }

    pub fn period(&self) -> Option<&str> {
        non_blank(self.period.as_deref())
    }

    pub fn company_name(&self) -> Option<&str> {
        non_blank(self.company_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
