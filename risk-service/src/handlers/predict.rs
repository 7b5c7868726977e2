//! Risk prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult};
use crate::models::{InferenceResult, TelemetryPacket};

/// Score one telemetry packet
pub async fn predict_risk(
    State(state): State<AppState>,
    payload: Result<Json<TelemetryPacket>, JsonRejection>,
) -> AppResult<Json<InferenceResult>> {
    let Json(packet) = payload?;

    let result = state.scorer.score(&packet);

    tracing::debug!(
        "Scored rainfall={} drainage={} population={} social={} -> {} [{}, {}] via {}",
        packet.rainfall,
        packet.drainage_capacity,
        packet.population_density,
        packet.social_spike,
        result.predicted_risk,
        result.confidence_low,
        result.confidence_high,
        result.model_used,
    );

    Ok(Json(result))
}
