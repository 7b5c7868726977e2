//! Regression forest
//!
//! Bagged CART regressors with a JSON artifact format. The trainer fits and
//! saves a [`RandomForest`]; the server loads it once at startup.

pub mod tree;
pub mod ensemble;
pub mod artifact;

use std::path::PathBuf;

pub use artifact::ModelMetadata;
pub use ensemble::{ForestParams, RandomForest};
pub use tree::{RegressionTree, TreeParams};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("model I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feature schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("tree {tree} is corrupt: {reason}")]
    CorruptTree { tree: usize, reason: String },

    #[error("invalid forest parameters: {0}")]
    InvalidParams(String),

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("{features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },
}
