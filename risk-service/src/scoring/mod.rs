//! Scoring Module - risk inference engines
//!
//! Two engines share one trait so the router does not care which is active:
//! a closed-form heuristic and a regression-forest ensemble that falls back
//! to the heuristic when no model is loaded.

pub mod formula;
pub mod heuristic;
pub mod ensemble;

use crate::models::{InferenceResult, TelemetryPacket};

pub use ensemble::EnsembleScorer;
pub use heuristic::HeuristicScorer;

/// Label reported when the heuristic formula produced the score.
pub const HEURISTIC_MODEL_ID: &str = "sentinel-heuristic-v1";

/// Label reported when the forest ensemble produced the score.
pub const ENSEMBLE_MODEL_ID: &str = "sentinel-rf-ensemble-v1";

/// A risk engine that can score one telemetry packet.
pub trait RiskScorer: Send + Sync {
    fn score(&self, packet: &TelemetryPacket) -> InferenceResult;

    /// Label the engine will put in `modelUsed` for the next request.
    fn active_model(&self) -> &'static str;

    /// Whether a trained model is backing this engine.
    fn is_model_loaded(&self) -> bool;
}
