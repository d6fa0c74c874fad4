//! Chart route: structured series from the chart fetcher.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::bridge::InvocationSpec;
use crate::http::error::ApiError;
use crate::http::request::TickerRequest;
use crate::http::server::AppState;

/// Interval used when the request does not name one.
pub const DEFAULT_INTERVAL: &str = "1d";

/// Period used when the request does not name one.
pub const DEFAULT_PERIOD: &str = "1y";

const CHART_FETCH_FAILED: &str = "Failed to fetch chart data";
const CHART_PARSE_FAILED: &str = "Failed to parse chart data";

/// `POST /chart`: worker args are `[ticker, interval, period]`; its stdout
/// must be JSON and is returned as the response body unchanged.
pub async fn fetch_chart(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request = TickerRequest::from_body(&body)?;
    let ticker = request.ticker()?;
    let interval = request.interval().unwrap_or(DEFAULT_INTERVAL);
    let period = request.period().unwrap_or(DEFAULT_PERIOD);

    tracing::info!(ticker = %ticker, interval = %interval, period = %period, "Fetching chart data");

    let spec = InvocationSpec::new(state.workers.command(&state.workers.chart))
        .args([ticker, interval, period]);
    let output = state
        .bridge
        .run(&spec)
        .await
        .map_err(|e| ApiError::from_bridge(CHART_FETCH_FAILED, e))?;

    parse_chart(&output).map(Json)
}

fn parse_chart(output: &str) -> Result<Value, ApiError> {
    serde_json::from_str(output).map_err(|e| ApiError::Parse {
        context: CHART_PARSE_FAILED,
        details: e.to_string(),
    })
}
