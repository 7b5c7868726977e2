//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    /// `REDIS_URL` verbatim
    broker: Option<String>,
    model_loaded: bool,
    model_used: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ML Inference",
        broker: state.config.redis_url.clone(),
        model_loaded: state.scorer.is_model_loaded(),
        model_used: state.scorer.active_model(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
