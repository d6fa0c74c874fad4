//! Response hardening and cross-origin headers.

use axum::http::{header, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Adds `X-Content-Type-Options: nosniff` unless a handler already set it.
pub fn nosniff_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

/// CORS for a frontend that may be served from another origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
