//! `POST /mozello/zenopay/process`

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::services::InitiationOutcome;
use crate::state::AppState;

/// Mozello posts the signed checkout here; the browser follows our redirect.
pub async fn process_payment(State(state): State<AppState>, body: Bytes) -> Response {
    match state.initiator.process(&body).await {
        InitiationOutcome::BadRequest => {
            (StatusCode::BAD_REQUEST, "Invalid request body").into_response()
        }
        InitiationOutcome::Denied => (StatusCode::FORBIDDEN, "Invalid signature").into_response(),
        InitiationOutcome::Redirect { url, .. } => {
            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
    }
}
