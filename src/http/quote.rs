//! Quote route: pass-through text from the quote fetcher.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::bridge::InvocationSpec;
use crate::http::error::ApiError;
use crate::http::request::TickerRequest;
use crate::http::response::TextPayload;
use crate::http::server::AppState;

const QUOTE_FAILED: &str = "Error running quote fetcher";

/// `POST /quote`: runs the quote fetcher with the ticker as its argument.
pub async fn fetch_quote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TextPayload>, ApiError> {
    let request = TickerRequest::from_body(&body)?;
    let ticker = request.ticker()?;

    tracing::info!(ticker = %ticker, "Fetching quote");

    let spec = InvocationSpec::new(state.workers.command(&state.workers.quote)).arg(ticker);
    let data = state
        .bridge
        .run(&spec)
        .await
        .map_err(|e| ApiError::from_bridge(QUOTE_FAILED, e))?;

    Ok(Json(TextPayload::new(data)))
}
