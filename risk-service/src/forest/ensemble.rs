//! Bagged ensemble of regression trees

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::models::{FEATURE_COUNT, FEATURE_NAMES};
use super::artifact::ModelMetadata;
use super::tree::{RegressionTree, TreeParams};
use super::ModelError;

/// Forest hyper-parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub metadata: ModelMetadata,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `n_estimators` trees, each on its own bootstrap resample.
    pub fn fit(
        x: &[[f64; FEATURE_COUNT]],
        y: &[f64],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        if params.n_estimators == 0 {
            return Err(ModelError::InvalidParams("n_estimators must be at least 1".to_string()));
        }
        if params.max_depth == 0 {
            return Err(ModelError::InvalidParams("max_depth must be at least 1".to_string()));
        }
        if x.len() != y.len() {
            return Err(ModelError::LengthMismatch {
                features: x.len(),
                targets: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let n = x.len();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut importance_sum = [0.0f64; FEATURE_COUNT];

        for i in 0..params.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let (tree, raw) = RegressionTree::fit(x, y, &sample, params.tree_params());

            let total: f64 = raw.iter().sum();
            if total > 0.0 {
                for (acc, v) in importance_sum.iter_mut().zip(raw.iter()) {
                    *acc += v / total;
                }
            }

            tracing::trace!("Tree {} fitted: {} nodes, depth {}", i, tree.node_count(), tree.depth());
            trees.push(tree);
        }

        let feature_importances = normalize(&importance_sum);
        let metadata = ModelMetadata::new(params, n, feature_importances);

        Ok(Self { metadata, trees })
    }

    /// Assemble a forest from already-built trees.
    pub fn from_trees(metadata: ModelMetadata, trees: Vec<RegressionTree>) -> Self {
        Self { metadata, trees }
    }

    /// One prediction per tree, in tree order.
    pub fn predict_each(&self, features: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        self.trees.iter().map(|t| t.predict(features)).collect()
    }

    /// Mean of the per-tree predictions (NaN if the forest is empty).
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let preds = self.predict_each(features);
        preds.iter().sum::<f64>() / preds.len() as f64
    }

    /// Impurity-based importances, summing to 1, in `FEATURE_NAMES` order.
    pub fn feature_importances(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.metadata.feature_importances.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub(crate) fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

fn normalize(values: &[f64; FEATURE_COUNT]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter().map(|v| v / total).collect()
    } else {
        vec![0.0; FEATURE_COUNT]
    }
}
