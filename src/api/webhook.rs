//! `POST /mozello/zenopay/webhook/:order_uuid`

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};

use crate::services::RelayOutcome;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// ZenoPay reports the payment result here.
pub async fn zenopay_webhook(
    State(state): State<AppState>,
    Path(order_uuid): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.relay.relay(&order_uuid, api_key, &body).await {
        RelayOutcome::Denied => (StatusCode::FORBIDDEN, "Invalid API key").into_response(),
        RelayOutcome::Relayed(_) => (StatusCode::OK, "OK").into_response(),
        RelayOutcome::Failed => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error processing webhook").into_response()
        }
    }
}
