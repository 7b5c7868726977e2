//! SentinelGov Flood Risk Inference Service
//!
//! Scores flood risk from four telemetry readings.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  SENTINEL RISK SERVICE                    │
//! ├───────────────────────────────────────────────────────────┤
//! │  POST /predict-risk ──► RiskScorer                        │
//! │                          ├─ EnsembleScorer (forest)       │
//! │                          │     └─ no model? ──┐           │
//! │                          └─ HeuristicScorer ◄─┘           │
//! │  GET /health                                              │
//! └───────────────────────────────────────────────────────────┘
//!            ▲
//!            │ models/flood_rf_model.json (read at startup)
//!   ┌────────┴────────┐
//!   │  train-model    │  synthetic data ─► forest ─► artifact
//!   └─────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod forest;
pub mod handlers;
pub mod models;
pub mod scoring;
pub mod training;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{Config, ScorerMode};
pub use error::{AppError, AppResult};

use scoring::{EnsembleScorer, HeuristicScorer, RiskScorer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn RiskScorer>,
    pub config: Config,
}

impl AppState {
    pub fn new(scorer: Arc<dyn RiskScorer>, config: Config) -> Self {
        Self { scorer, config }
    }
}

/// Pick and initialise the scoring engine for this process.
///
/// The ensemble model is read here, once; failures leave the process in
/// fallback mode.
pub fn build_scorer(config: &Config) -> Arc<dyn RiskScorer> {
    match config.scorer {
        ScorerMode::Ensemble => Arc::new(EnsembleScorer::load(&config.model_path)),
        ScorerMode::Heuristic => {
            tracing::info!("Heuristic scorer selected, skipping model load");
            Arc::new(HeuristicScorer::new())
        }
    }
}

/// Initialize logging
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sentinel_risk=debug,train_model=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict-risk", post(handlers::predict::predict_risk))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestParams, ModelMetadata, RandomForest, RegressionTree};
    use crate::models::TelemetryPacket;
    use crate::scoring::{ENSEMBLE_MODEL_ID, HEURISTIC_MODEL_ID};

    fn write_artifact(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("flood_rf_model.json");
        let metadata = ModelMetadata::new(&ForestParams::default(), 0, vec![0.25; 4]);
        RandomForest::from_trees(metadata, vec![RegressionTree::constant(70.0)])
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_heuristic_mode_skips_model_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            scorer: ScorerMode::Heuristic,
            model_path: write_artifact(&dir),
            ..Config::default()
        };

        let scorer = build_scorer(&config);
        assert!(!scorer.is_model_loaded());
        assert_eq!(scorer.active_model(), HEURISTIC_MODEL_ID);

        let result = scorer.score(&TelemetryPacket::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(result.model_used, HEURISTIC_MODEL_ID);
        assert_eq!(result.predicted_risk, 0.0);
    }

    #[test]
    fn test_ensemble_mode_loads_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            scorer: ScorerMode::Ensemble,
            model_path: write_artifact(&dir),
            ..Config::default()
        };

        let scorer = build_scorer(&config);
        assert!(scorer.is_model_loaded());
        assert_eq!(scorer.active_model(), ENSEMBLE_MODEL_ID);
        assert_eq!(scorer.score(&TelemetryPacket::new(0.0, 1.0, 0.0, 0.0)).predicted_risk, 70.0);
    }
}
