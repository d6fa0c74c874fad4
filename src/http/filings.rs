//! Filings route: pass-through text from the filings fetcher.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::bridge::InvocationSpec;
use crate::http::error::ApiError;
use crate::http::request::TickerRequest;
use crate::http::response::TextPayload;
use crate::http::server::AppState;

const FILINGS_FAILED: &str = "Error running filings fetcher";

/// `POST /filings`: the ticker is delivered on the worker's stdin.
pub async fn fetch_filings(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TextPayload>, ApiError> {
    let request = TickerRequest::from_body(&body)?;
    let ticker = request.ticker()?;

    tracing::info!(ticker = %ticker, "Fetching filings");

    let spec = InvocationSpec::new(state.workers.command(&state.workers.filings)).payload(ticker);
    let data = state
        .bridge
        .run(&spec)
        .await
        .map_err(|e| ApiError::from_bridge(FILINGS_FAILED, e))?;

    Ok(Json(TextPayload::new(data)))
}
