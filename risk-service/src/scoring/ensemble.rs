//! Ensemble scorer - regression forest with heuristic fallback
//!
//! The forest is loaded once. If that fails the scorer stays in fallback
//! mode for the life of the process; it never retries.

use std::path::Path;
use std::sync::Arc;

use crate::forest::RandomForest;
use crate::models::{InferenceResult, TelemetryPacket};
use super::heuristic::HeuristicScorer;
use super::{RiskScorer, ENSEMBLE_MODEL_ID};

/// z-value for a two-sided 95% interval.
pub const Z_95: f64 = 1.96;

/// Ensemble band never narrower than this many points either side.
pub const MIN_ENSEMBLE_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct EnsembleScorer {
    forest: Option<Arc<RandomForest>>,
    fallback: HeuristicScorer,
}

impl EnsembleScorer {
    /// Load the forest from `path`, or fall back permanently on any error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        tracing::info!("Loading ensemble model from: {}", path.display());

        match RandomForest::load(path) {
            Ok(forest) => {
                let meta = &forest.metadata;
                tracing::info!(
                    "Ensemble model loaded: {} trees, max_depth {}, trained {} on {} samples (test MAE {:?}, R² {:?})",
                    forest.len(),
                    meta.params.max_depth,
                    meta.trained_at.to_rfc3339(),
                    meta.training_samples,
                    meta.test_mae,
                    meta.test_r2,
                );
                Self::from_forest(forest)
            }
            Err(e) => {
                tracing::warn!("Ensemble model unavailable ({}), serving heuristic fallback", e);
                Self::fallback_only()
            }
        }
    }

    pub fn from_forest(forest: RandomForest) -> Self {
        if forest.is_empty() {
            tracing::warn!("Ensemble model has no trees, serving heuristic fallback");
            return Self::fallback_only();
        }
        Self {
            forest: Some(Arc::new(forest)),
            fallback: HeuristicScorer,
        }
    }

    pub fn fallback_only() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.forest.is_some()
    }
}

/// Mean and 95%-style margin of the per-tree predictions.
///
/// Spread is the population standard deviation. Returns `None` for an empty
/// slice.
pub fn aggregate(predictions: &[f64]) -> Option<(f64, f64)> {
    if predictions.is_empty() {
        return None;
    }

    let n = predictions.len() as f64;
    let mean = predictions.iter().sum::<f64>() / n;
    let variance = predictions.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let margin = (Z_95 * variance.sqrt()).max(MIN_ENSEMBLE_MARGIN);

    Some((mean, margin))
}

impl RiskScorer for EnsembleScorer {
    fn score(&self, packet: &TelemetryPacket) -> InferenceResult {
        let Some(forest) = self.forest.as_deref() else {
            return self.fallback.score(packet);
        };

        let predictions = forest.predict_each(&packet.clipped().features());
        match aggregate(&predictions) {
            Some((mean, margin)) => InferenceResult::from_band(mean, margin, ENSEMBLE_MODEL_ID),
            None => self.fallback.score(packet),
        }
    }

    fn active_model(&self) -> &'static str {
        if self.is_loaded() {
            ENSEMBLE_MODEL_ID
        } else {
            self.fallback.active_model()
        }
    }

    fn is_model_loaded(&self) -> bool {
        self.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestParams, ModelMetadata, RegressionTree};
    use crate::scoring::HEURISTIC_MODEL_ID;
    use tempfile::tempdir;

    fn forest_of(values: &[f64]) -> RandomForest {
        let metadata = ModelMetadata::new(&ForestParams::default(), 0, vec![0.25; 4]);
        RandomForest::from_trees(
            metadata,
            values.iter().map(|&v| RegressionTree::constant(v)).collect(),
        )
    }

    fn packet() -> TelemetryPacket {
        TelemetryPacket::new(60.0, 0.5, 0.5, 0.5)
    }

    #[test]
    fn test_aggregate_mean_and_population_std() {
        // Population std of [10, 20, 30] is sqrt(200/3)
        let (mean, margin) = aggregate(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(mean, 20.0);
        assert!((margin - 1.96 * (200.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn test_margin_floor_with_zero_variance() {
        let (_, margin) = aggregate(&[40.0; 25]).unwrap();
        assert_eq!(margin, MIN_ENSEMBLE_MARGIN);

        let result = EnsembleScorer::from_forest(forest_of(&[40.0; 5])).score(&packet());
        assert_eq!(result.predicted_risk, 40.0);
        assert_eq!(result.confidence_high, 42.0);
        assert_eq!(result.confidence_low, 38.0);
        assert_eq!(result.model_used, ENSEMBLE_MODEL_ID);
    }

    #[test]
    fn test_band_clamped_at_edges() {
        let result = EnsembleScorer::from_forest(forest_of(&[90.0, 110.0])).score(&packet());
        assert_eq!(result.predicted_risk, 100.0);
        assert_eq!(result.confidence_high, 100.0);
        assert!(result.confidence_low < 100.0);

        let result = EnsembleScorer::from_forest(forest_of(&[0.0, 1.0])).score(&packet());
        assert_eq!(result.confidence_low, 0.0);
        assert!(result.confidence_low <= result.predicted_risk);
    }

    #[test]
    fn test_empty_forest_falls_back() {
        let scorer = EnsembleScorer::from_forest(forest_of(&[]));
        assert!(!scorer.is_loaded());
        assert_eq!(scorer.score(&packet()).model_used, HEURISTIC_MODEL_ID);
    }

    #[test]
    fn test_missing_artifact_falls_back() {
        let dir = tempdir().unwrap();
        let scorer = EnsembleScorer::load(dir.path().join("flood_rf_model.json"));

        assert!(!scorer.is_model_loaded());
        assert_eq!(scorer.active_model(), HEURISTIC_MODEL_ID);

        let p = packet();
        assert_eq!(scorer.score(&p), HeuristicScorer.score(&p));
    }

    #[test]
    fn test_loaded_artifact_is_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        forest_of(&[50.0, 54.0]).save(&path).unwrap();

        let scorer = EnsembleScorer::load(&path);
        assert!(scorer.is_loaded());
        assert_eq!(scorer.active_model(), ENSEMBLE_MODEL_ID);

        let result = scorer.score(&packet());
        assert_eq!(result.predicted_risk, 52.0);
        // std = 2, 1.96 * 2 = 3.92
        assert_eq!(result.confidence_high, 55.9);
        assert_eq!(result.confidence_low, 48.1);
    }
}
