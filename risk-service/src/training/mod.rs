//! Offline training pipeline
//!
//! Synthetic data generation, evaluation metrics and the end-to-end
//! `train_and_export` routine behind the `train-model` binary.

pub mod synthetic;
pub mod split;
pub mod metrics;
pub mod trainer;

pub use metrics::{mean_absolute_error, r2_score};
pub use split::train_test_split;
pub use synthetic::{generate_synthetic_data, LabeledRecord, Segment};
pub use trainer::{train_and_export, train_model, TrainConfig, TrainingReport};
