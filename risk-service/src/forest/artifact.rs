//! Model artifact - JSON on disk
//!
//! The artifact carries its own metadata so the server can log what it
//! loaded and refuse forests trained on a different feature layout.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FEATURE_NAMES;
use super::ensemble::{ForestParams, RandomForest};
use super::ModelError;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/flood_rf_model.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub feature_names: Vec<String>,
    pub params: ForestParams,
    pub training_samples: usize,
    pub feature_importances: Vec<f64>,
    pub trained_at: DateTime<Utc>,
    /// Held-out metrics, filled in by the trainer after evaluation
    pub test_mae: Option<f64>,
    pub test_r2: Option<f64>,
}

impl ModelMetadata {
    pub fn new(params: &ForestParams, training_samples: usize, feature_importances: Vec<f64>) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            params: *params,
            training_samples,
            feature_importances,
            trained_at: Utc::now(),
            test_mae: None,
            test_r2: None,
        }
    }
}

impl RandomForest {
    /// Write the forest as JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;

        tracing::info!("Model artifact written to {} ({} trees)", path.display(), self.len());
        Ok(())
    }

    /// Read and validate a forest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let forest: RandomForest = serde_json::from_reader(reader)?;
        forest.validate()?;

        Ok(forest)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        if self.metadata.feature_names != expected {
            return Err(ModelError::SchemaMismatch {
                expected,
                found: self.metadata.feature_names.clone(),
            });
        }

        for (i, tree) in self.trees().iter().enumerate() {
            tree.validate()
                .map_err(|reason| ModelError::CorruptTree { tree: i, reason })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::RegressionTree;
    use tempfile::tempdir;

    fn tiny_forest() -> RandomForest {
        let metadata = ModelMetadata::new(&ForestParams::default(), 0, vec![0.25; 4]);
        RandomForest::from_trees(
            metadata,
            vec![RegressionTree::constant(12.0), RegressionTree::constant(18.0)],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        tiny_forest().save(&path).unwrap();
        let loaded = RandomForest::load(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.predict_each(&[0.0; 4]), vec![12.0, 18.0]);
        assert_eq!(loaded.metadata.feature_names, FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = RandomForest::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_corrupt_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(RandomForest::load(&path), Err(ModelError::Json(_))));
    }

    #[test]
    fn test_schema_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut forest = tiny_forest();
        forest.metadata.feature_names.reverse();
        forest.save(&path).unwrap();

        assert!(matches!(
            RandomForest::load(&path),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_tree_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut value = serde_json::to_value(tiny_forest()).unwrap();
        value["trees"][1]["nodes"] = serde_json::json!([
            { "kind": "split", "feature": 0, "threshold": 1.0, "left": 5, "right": 6 }
        ]);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(
            RandomForest::load(&path),
            Err(ModelError::CorruptTree { tree: 1, .. })
        ));
    }
}
