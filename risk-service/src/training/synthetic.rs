//! Synthetic telemetry generator
//!
//! Three scenario segments with disjoint input ranges, labelled with the
//! ground-truth formula plus gaussian sensor noise.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::models::{clamp_score, TelemetryPacket};
use crate::scoring::formula::ground_truth_risk;

/// Standard deviation of the sensor noise added to each target.
pub const NOISE_STD: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Low rainfall, good drainage
    Nominal,
    /// Heavy rain, drainage mostly coping
    Moderate,
    /// Extreme rain, failing drainage
    Crisis,
}

/// Uniform sampling ranges for one segment.
#[derive(Debug, Clone)]
pub struct SegmentRanges {
    pub rainfall: Range<f64>,
    pub drainage_capacity: Range<f64>,
    pub population_density: Range<f64>,
    pub social_spike: Range<f64>,
}

impl Segment {
    pub fn ranges(&self) -> SegmentRanges {
        match self {
            Segment::Nominal => SegmentRanges {
                rainfall: 0.0..30.0,
                drainage_capacity: 0.7..1.0,
                population_density: 0.1..0.4,
                social_spike: 0.0..0.2,
            },
            Segment::Moderate => SegmentRanges {
                rainfall: 30.0..80.0,
                drainage_capacity: 0.5..0.9,
                population_density: 0.2..0.6,
                social_spike: 0.1..0.5,
            },
            Segment::Crisis => SegmentRanges {
                rainfall: 80.0..150.0,
                drainage_capacity: 0.0..0.4,
                population_density: 0.5..0.9,
                social_spike: 0.6..1.0,
            },
        }
    }

    /// Record counts for a dataset of `total`: 40% / 30% / remainder.
    pub fn split_counts(total: usize) -> [(Segment, usize); 3] {
        let nominal = total * 4 / 10;
        let moderate = total * 3 / 10;
        [
            (Segment::Nominal, nominal),
            (Segment::Moderate, moderate),
            (Segment::Crisis, total - nominal - moderate),
        ]
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TelemetryPacket {
        let r = self.ranges();
        TelemetryPacket {
            rainfall: rng.gen_range(r.rainfall),
            drainage_capacity: rng.gen_range(r.drainage_capacity),
            population_density: rng.gen_range(r.population_density),
            social_spike: rng.gen_range(r.social_spike),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub segment: Segment,
    pub telemetry: TelemetryPacket,
    /// Noisy target the forest is trained on
    pub target_risk: f64,
}

/// Generate `num_samples` labelled records in shuffled order.
pub fn generate_synthetic_data<R: Rng + ?Sized>(num_samples: usize, rng: &mut R) -> Vec<LabeledRecord> {
    tracing::info!("Generating {} synthetic telemetry records...", num_samples);

    let mut records = Vec::with_capacity(num_samples);
    for (segment, count) in Segment::split_counts(num_samples) {
        for _ in 0..count {
            let telemetry = segment.sample(rng);
            let z: f64 = StandardNormal.sample(rng);
            let noise = z * NOISE_STD;
            records.push(LabeledRecord {
                segment,
                telemetry,
                target_risk: clamp_score(ground_truth_risk(&telemetry) + noise),
            });
        }
    }

    records.shuffle(rng);
    records
}
