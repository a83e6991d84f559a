use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::mozello::StaticMerchantKeys;
use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub zenopay_base_url: String,
    pub merchants_configured: usize,
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let version = env!("CARGO_PKG_VERSION").to_string();
    let config = &state.config;

    let merchants_configured = StaticMerchantKeys::from_config(&config.zenopay).len();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version,
        environment: config.server.environment.clone(),
        zenopay_base_url: config.zenopay.base_url.clone(),
        merchants_configured,
    };

    Ok(Json(response))
}
