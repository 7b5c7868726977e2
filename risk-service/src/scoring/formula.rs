//! Risk formulas
//!
//! Two versions of the flood-risk equation live here on purpose:
//!
//! - [`serving_risk`] is what the heuristic scorer answers requests with.
//! - [`ground_truth_risk`] labels the synthetic training data.
//!
//! They are NOT the same equation. Ground truth raises drainage failure to
//! 1.2 and adds a rain x drainage interaction term, so a forest trained on it
//! approximates something different from the fallback it replaces. Keep both
//! and measure the drift (see `training::trainer`); do not merge them.

use crate::models::TelemetryPacket;

/// Marginal rainfall impact accelerates with this exponent.
pub const RAIN_EXPONENT: f64 = 1.3;

pub const RAIN_WEIGHT: f64 = 0.5;
pub const DRAINAGE_WEIGHT: f64 = 0.25;
pub const SOCIAL_WEIGHT: f64 = 0.15;
pub const POPULATION_WEIGHT: f64 = 0.10;

/// Ground truth only
pub const DRAINAGE_EXPONENT: f64 = 1.2;
/// Ground truth only
pub const INTERACTION_WEIGHT: f64 = 0.1;

/// Serving-time heuristic risk in [0, 100].
pub fn serving_risk(packet: &TelemetryPacket) -> f64 {
    let p = packet.clipped();

    let rain_impact = p.rain_norm().powf(RAIN_EXPONENT);
    let combined_geo = rain_impact * RAIN_WEIGHT + p.drainage_failure() * DRAINAGE_WEIGHT;
    let base = combined_geo
        + p.social_spike * SOCIAL_WEIGHT
        + p.population_density * POPULATION_WEIGHT;

    (base * 100.0).clamp(0.0, 100.0)
}

/// Noise-free training target in [0, 100].
pub fn ground_truth_risk(packet: &TelemetryPacket) -> f64 {
    let p = packet.clipped();
    let rain_norm = p.rain_norm();
    let drain_fail = p.drainage_failure();

    let combined_geo = rain_norm.powf(RAIN_EXPONENT) * RAIN_WEIGHT
        + drain_fail.powf(DRAINAGE_EXPONENT) * DRAINAGE_WEIGHT
        + rain_norm * drain_fail * INTERACTION_WEIGHT;
    let base = combined_geo
        + p.social_spike * SOCIAL_WEIGHT
        + p.population_density * POPULATION_WEIGHT;

    (base * 100.0).clamp(0.0, 100.0)
}
