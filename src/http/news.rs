//! News route: optional enrichment that degrades instead of failing.
//!
//! The worker entry point is fixed. Its input is one JSON line on stdin
//! (`apiKey`, `ticker`, `companyName`, `limit`), so request values are only
//! ever data to it. Every failure past request validation, a missing API
//! key included, is answered with 200 and an empty article list.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::bridge::InvocationSpec;
use crate::http::error::ApiError;
use crate::http::request::TickerRequest;
use crate::http::response::NewsPayload;
use crate::http::server::AppState;

const NEWS_FETCH_FAILED: &str = "Failed to fetch news";
const NEWS_PARSE_FAILED: &str = "Failed to parse news data";
const NEWS_WORKER_FAILED: &str = "News fetcher reported an error";

/// Setting that holds the news provider key.
pub const API_KEY_SETTING: &str = "NEWS_API_KEY";

/// The single input line handed to the news worker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsWorkerRequest<'a> {
    api_key: &'a str,
    ticker: &'a str,
    company_name: Option<&'a str>,
    limit: u32,
}

/// `POST /news`
pub async fn fetch_news(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match TickerRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let ticker = match request.ticker() {
        Ok(ticker) => ticker,
        Err(e) => return e.into_response(),
    };

    tracing::info!(ticker = %ticker, company = ?request.company_name(), "Fetching news");

    match fetch_articles(&state, ticker, request.company_name()).await {
        Ok(articles) => {
            tracing::debug!(ticker = %ticker, count = articles.len(), "News fetched");
            Json(NewsPayload::articles(articles)).into_response()
        }
        Err(e) => {
            tracing::warn!(
                ticker = %ticker,
                error = %e,
                details = ?e.details(),
                "News unavailable, returning empty article list"
            );
            Json(NewsPayload::degraded(e.to_string(), e.details())).into_response()
        }
    }
}

async fn fetch_articles(
    state: &AppState,
    ticker: &str,
    company_name: Option<&str>,
) -> Result<Vec<Value>, ApiError> {
    let api_key = state.news.api_key().ok_or(ApiError::Configuration {
        setting: API_KEY_SETTING,
    })?;

    let input = NewsWorkerRequest {
        api_key,
        ticker,
        company_name,
        limit: state.news.article_limit,
    };
    let line = serde_json::to_string(&input).map_err(|e| ApiError::Parse {
        context: NEWS_FETCH_FAILED,
        details: e.to_string(),
    })?;

    let spec = InvocationSpec::new(state.workers.command(&state.workers.news)).payload(line);
    let output = state
        .bridge
        .run(&spec)
        .await
        .map_err(|e| ApiError::from_bridge(NEWS_FETCH_FAILED, e))?;

    parse_articles(&output)
}

/// Accepts a bare article array or `{"articles": [...]}`. An object with a
/// non-null `error`, or with `"success": false`, is the worker reporting
/// its own failure. Articles must be objects and are returned unchanged.
fn parse_articles(output: &str) -> Result<Vec<Value>, ApiError> {
    let parse_error = |details: String| ApiError::Parse {
        context: NEWS_PARSE_FAILED,
        details,
    };

    let value: Value = serde_json::from_str(output).map_err(|e| parse_error(e.to_string()))?;

    let articles = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
                return Err(ApiError::WorkerReported {
                    context: NEWS_WORKER_FAILED,
                    details: match error {
                        Value::String(message) => message.clone(),
                        other => other.to_string(),
                    },
                });
            }
            if map.get("success") == Some(&Value::Bool(false)) {
                return Err(ApiError::WorkerReported {
                    context: NEWS_WORKER_FAILED,
                    details: "worker returned success: false".to_string(),
                });
            }
            match map.remove("articles") {
                Some(Value::Array(items)) => items,
                _ => return Err(parse_error("expected an \"articles\" array".to_string())),
            }
        }
        _ => return Err(parse_error("expected a JSON array or object".to_string())),
    };

    if let Some(position) = articles.iter().position(|article| !article.is_object()) {
        return Err(parse_error(format!("article {} is not a JSON object", position)));
    }

    Ok(articles)
}
