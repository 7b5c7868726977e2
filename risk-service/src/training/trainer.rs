//! Trainer - generate, fit, evaluate, export

use std::env;
use std::fmt;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::forest::artifact::DEFAULT_MODEL_PATH;
use crate::forest::{ForestParams, ModelError, RandomForest};
use crate::models::FEATURE_COUNT;
use crate::scoring::formula::{ground_truth_risk, serving_risk};
use super::metrics::{mean_absolute_error, r2_score};
use super::split::train_test_split;
use super::synthetic::{generate_synthetic_data, LabeledRecord};

/// Trainer configuration
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub num_samples: usize,
    pub test_fraction: f64,
    pub forest: ForestParams,
    pub output_path: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_samples: 15_000,
            test_fraction: 0.2,
            forest: ForestParams::default(),
            output_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl TrainConfig {
    /// Load overrides from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let forest = ForestParams {
            n_estimators: parse_env("TRAIN_ESTIMATORS").unwrap_or(defaults.forest.n_estimators),
            max_depth: parse_env("TRAIN_MAX_DEPTH").unwrap_or(defaults.forest.max_depth),
            seed: parse_env("TRAIN_SEED").unwrap_or(defaults.forest.seed),
            ..defaults.forest
        };

        Self {
            num_samples: parse_env("TRAIN_SAMPLES").unwrap_or(defaults.num_samples),
            test_fraction: defaults.test_fraction,
            forest,
            output_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_samples: usize,
    pub test_samples: usize,
    pub n_estimators: usize,
    pub max_depth: usize,
    pub mae: f64,
    pub r2: f64,
    /// MAE of the serving heuristic against the noise-free ground truth on
    /// the test split; the size of the formula drift.
    pub heuristic_drift_mae: f64,
    pub feature_importances: Vec<(&'static str, f64)>,
    pub output_path: PathBuf,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training Complete!")?;
        writeln!(f, "Samples: {} train / {} test", self.train_samples, self.test_samples)?;
        writeln!(f, "Model Mean Absolute Error (MAE): {:.2}", self.mae)?;
        writeln!(f, "Model R² Score: {:.4}", self.r2)?;
        writeln!(f, "Heuristic vs ground-truth drift (MAE): {:.2}", self.heuristic_drift_mae)?;
        writeln!(f)?;
        writeln!(f, "Feature Importances:")?;
        for (name, importance) in &self.feature_importances {
            writeln!(f, "  - {}: {:.1}%", name, importance * 100.0)?;
        }
        writeln!(f)?;
        write!(f, "Model weights exported to: {}", self.output_path.display())
    }
}

fn to_matrix(records: &[LabeledRecord]) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    records
        .iter()
        .map(|r| (r.telemetry.features(), r.target_risk))
        .unzip()
}

/// Generate data, fit and evaluate a forest without touching disk.
pub fn train_model(config: &TrainConfig) -> Result<(RandomForest, TrainingReport), ModelError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.forest.seed);

    let records = generate_synthetic_data(config.num_samples, &mut rng);
    let (train, test) = train_test_split(records, config.test_fraction, &mut rng);

    let (x_train, y_train) = to_matrix(&train);
    let (x_test, y_test) = to_matrix(&test);

    tracing::info!(
        "Training Random Forest Regressor (n_estimators={}, max_depth={}) on {} records...",
        config.forest.n_estimators,
        config.forest.max_depth,
        x_train.len()
    );
    let mut forest = RandomForest::fit(&x_train, &y_train, &config.forest)?;

    let y_pred: Vec<f64> = x_test.iter().map(|x| forest.predict(x)).collect();
    let mae = mean_absolute_error(&y_test, &y_pred);
    let r2 = r2_score(&y_test, &y_pred);

    let truth: Vec<f64> = test
        .iter()
        .map(|r| ground_truth_risk(&r.telemetry))
        .collect();
    let heuristic: Vec<f64> = test.iter().map(|r| serving_risk(&r.telemetry)).collect();
    let heuristic_drift_mae = mean_absolute_error(&truth, &heuristic);

    forest.metadata.test_mae = Some(mae);
    forest.metadata.test_r2 = Some(r2);

    let report = TrainingReport {
        train_samples: x_train.len(),
        test_samples: x_test.len(),
        n_estimators: config.forest.n_estimators,
        max_depth: config.forest.max_depth,
        mae,
        r2,
        heuristic_drift_mae,
        feature_importances: forest.feature_importances(),
        output_path: config.output_path.clone(),
    };

    tracing::info!("Evaluation: MAE {:.2}, R² {:.4}, heuristic drift {:.2}", mae, r2, heuristic_drift_mae);
    Ok((forest, report))
}

/// Full pipeline: train, evaluate, write the artifact to `output_path`.
pub fn train_and_export(config: &TrainConfig) -> Result<TrainingReport, ModelError> {
    let (forest, report) = train_model(config)?;
    forest.save(&config.output_path)?;
    Ok(report)
}
