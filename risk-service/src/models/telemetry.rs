//! Telemetry and inference payloads

use serde::{Deserialize, Serialize};

/// Rainfall above this ceiling (mm) saturates the rainfall impact.
pub const RAINFALL_CEILING_MM: f64 = 150.0;

/// Feature order shared by the trainer and the ensemble artifact.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "rainfall",
    "drainageCapacity",
    "populationDensity",
    "socialSpike",
];

pub const FEATURE_COUNT: usize = 4;

/// One set of sensor readings for a single scoring request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPacket {
    /// Rainfall in millimetres (>= 0)
    pub rainfall: f64,
    /// Fraction of drainage capacity still available (0-1)
    pub drainage_capacity: f64,
    /// Normalized population density (0-1)
    pub population_density: f64,
    /// Social-media activity spike (0-1)
    pub social_spike: f64,
}

impl TelemetryPacket {
    pub fn new(rainfall: f64, drainage_capacity: f64, population_density: f64, social_spike: f64) -> Self {
        Self {
            rainfall,
            drainage_capacity,
            population_density,
            social_spike,
        }
    }

    /// Clip every reading into its documented range.
    pub fn clipped(&self) -> Self {
        Self {
            rainfall: self.rainfall.max(0.0),
            drainage_capacity: self.drainage_capacity.clamp(0.0, 1.0),
            population_density: self.population_density.clamp(0.0, 1.0),
            social_spike: self.social_spike.clamp(0.0, 1.0),
        }
    }

    /// Rainfall scaled against the ceiling, clamped to [0, 1].
    pub fn rain_norm(&self) -> f64 {
        (self.rainfall / RAINFALL_CEILING_MM).clamp(0.0, 1.0)
    }

    pub fn drainage_failure(&self) -> f64 {
        1.0 - self.drainage_capacity
    }

    /// Raw feature vector in `FEATURE_NAMES` order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.rainfall,
            self.drainage_capacity,
            self.population_density,
            self.social_spike,
        ]
    }
}

/// Scored response returned by `/predict-risk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceResult {
    pub predicted_risk: f64,
    pub confidence_high: f64,
    pub confidence_low: f64,
    pub model_used: String,
}

impl InferenceResult {
    /// Build a result from a raw score and symmetric margin.
    ///
    /// Score and both band edges are clamped to [0, 100], then rounded to one
    /// decimal place.
    pub fn from_band(risk: f64, margin: f64, model_used: &str) -> Self {
        let risk = clamp_score(risk);
        Self {
            predicted_risk: round1(risk),
            confidence_high: round1(clamp_score(risk + margin)),
            confidence_low: round1(clamp_score(risk - margin)),
            model_used: model_used.to_string(),
        }
    }
}

/// Clamp to the [0, 100] risk scale.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{"rainfall":42.0,"drainageCapacity":0.5,"populationDensity":0.3,"socialSpike":0.1}"#;
        let packet: TelemetryPacket = serde_json::from_str(json).unwrap();
        assert_eq!(packet, TelemetryPacket::new(42.0, 0.5, 0.3, 0.1));

        let result = InferenceResult::from_band(50.0, 4.0, "x");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["predictedRisk"], 50.0);
        assert_eq!(value["confidenceHigh"], 54.0);
        assert_eq!(value["confidenceLow"], 46.0);
        assert_eq!(value["modelUsed"], "x");
    }

    #[test]
    fn test_clipping() {
        let packet = TelemetryPacket::new(-5.0, 1.4, -0.2, 3.0).clipped();
        assert_eq!(packet, TelemetryPacket::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(TelemetryPacket::new(900.0, 0.0, 0.0, 0.0).rain_norm(), 1.0);
    }

    #[test]
    fn test_band_is_clamped() {
        let result = InferenceResult::from_band(99.0, 5.0, "x");
        assert_eq!(result.confidence_high, 100.0);
        assert_eq!(result.confidence_low, 94.0);

        let result = InferenceResult::from_band(-3.0, 2.0, "x");
        assert_eq!(result.predicted_risk, 0.0);
        assert_eq!(result.confidence_low, 0.0);
        assert_eq!(result.confidence_high, 2.0);
    }
}
