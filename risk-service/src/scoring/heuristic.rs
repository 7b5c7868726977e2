//! Heuristic scorer - deterministic formula, no model required

use crate::models::{InferenceResult, TelemetryPacket};
use super::formula::serving_risk;
use super::{RiskScorer, HEURISTIC_MODEL_ID};

/// Band never narrower than this many points either side.
pub const MIN_MARGIN: f64 = 3.0;

/// Band widens proportionally with the score.
pub const MARGIN_RATIO: f64 = 0.08;

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Symmetric margin for a given risk score.
    pub fn margin(risk: f64) -> f64 {
        (risk * MARGIN_RATIO).max(MIN_MARGIN)
    }
}

impl RiskScorer for HeuristicScorer {
    fn score(&self, packet: &TelemetryPacket) -> InferenceResult {
        let risk = serving_risk(packet);
        InferenceResult::from_band(risk, Self::margin(risk), HEURISTIC_MODEL_ID)
    }

    fn active_model(&self) -> &'static str {
        HEURISTIC_MODEL_ID
    }

    fn is_model_loaded(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_input() {
        let result = HeuristicScorer.score(&TelemetryPacket::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(result.predicted_risk, 0.0);
        assert_eq!(result.confidence_low, 0.0);
        assert_eq!(result.confidence_high, 3.0);
        assert_eq!(result.model_used, HEURISTIC_MODEL_ID);
    }

    #[test]
    fn test_saturated_input() {
        let result = HeuristicScorer.score(&TelemetryPacket::new(150.0, 0.0, 1.0, 1.0));
        assert_eq!(result.predicted_risk, 100.0);
        assert_eq!(result.confidence_high, 100.0);
        assert_eq!(result.confidence_low, 92.0);
    }

    #[test]
    fn test_deterministic() {
        let packet = TelemetryPacket::new(63.2, 0.41, 0.77, 0.18);
        let first = HeuristicScorer.score(&packet);
        for _ in 0..10 {
            assert_eq!(HeuristicScorer.score(&packet), first);
        }
    }

    #[test]
    fn test_margin_floor_and_ratio() {
        assert_eq!(HeuristicScorer::margin(10.0), 3.0);
        assert!((HeuristicScorer::margin(50.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_over_grid() {
        let steps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        for &rain in &[0.0, 10.0, 45.0, 90.0, 150.0, 400.0] {
            for &drain in &steps {
                for &pop in &steps {
                    for &soc in &steps {
                        let r = HeuristicScorer.score(&TelemetryPacket::new(rain, drain, pop, soc));
                        assert!((0.0..=100.0).contains(&r.predicted_risk));
                        assert!((0.0..=100.0).contains(&r.confidence_high));
                        assert!((0.0..=100.0).contains(&r.confidence_low));
                        assert!(r.confidence_low <= r.predicted_risk);
                        assert!(r.predicted_risk <= r.confidence_high);
                    }
                }
            }
        }
    }
}
