//! CART regression tree
//!
//! Splits minimise the summed squared error of the two children. Every
//! feature is considered at every node.

use serde::{Deserialize, Serialize};

use crate::models::FEATURE_COUNT;

/// Flat node storage; children are indices into `RegressionTree::nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

struct Builder<'a> {
    x: &'a [[f64; FEATURE_COUNT]],
    y: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
    importances: [f64; FEATURE_COUNT],
}

impl RegressionTree {
    /// Fit on the rows named by `sample` (duplicates act as weights).
    ///
    /// Returns the tree and its raw impurity decrease per feature.
    pub fn fit(
        x: &[[f64; FEATURE_COUNT]],
        y: &[f64],
        sample: &[usize],
        params: TreeParams,
    ) -> (Self, [f64; FEATURE_COUNT]) {
        let mut builder = Builder {
            x,
            y,
            params,
            nodes: Vec::new(),
            importances: [0.0; FEATURE_COUNT],
        };

        let mut indices = sample.to_vec();
        if indices.is_empty() {
            builder.nodes.push(Node::Leaf { value: 0.0 });
        } else {
            builder.grow(&mut indices, 0);
        }

        (Self { nodes: builder.nodes }, builder.importances)
    }

    /// Single-leaf tree that always predicts `value`.
    pub fn constant(value: f64) -> Self {
        Self { nodes: vec![Node::Leaf { value }] }
    }

    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if features[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Structural check for deserialized trees.
    ///
    /// Children must point forward so prediction always terminates.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(format!("node {} has non-finite value", i));
                }
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(format!("node {} splits on unknown feature {}", i, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { .. } => {}
            }
        }
        Ok(())
    }
}

impl Builder<'_> {
    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let id = self.nodes.len();
        let n = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let v = self.y[i];
            (s + v, sq + v * v)
        });
        let mean = sum / n as f64;
        let node_sse = (sum_sq - sum * sum / n as f64).max(0.0);

        self.nodes.push(Node::Leaf { value: mean });

        if depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || node_sse <= f64::EPSILON
        {
            return id;
        }

        let Some(best) = self.best_split(indices, node_sse) else {
            return id;
        };

        self.importances[best.feature] += node_sse - best.sse;

        let split_at = partition(indices, |i| self.x[i][best.feature] <= best.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(split_at);

        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);

        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&self, indices: &[usize], node_sse: f64) -> Option<BestSplit> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let (total_sum, total_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let v = self.y[i];
            (s + v, sq + v * v)
        });

        let mut best: Option<BestSplit> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..FEATURE_COUNT {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[i][feature], self.y[i])));
            column.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for k in 1..n {
                let (prev_x, prev_y) = column[k - 1];
                left_sum += prev_y;
                left_sq += prev_y * prev_y;

                let next_x = column[k].0;
                if prev_x == next_x || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let left_n = k as f64;
                let right_n = (n - k) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;

                let sse = (left_sq - left_sum * left_sum / left_n).max(0.0)
                    + (right_sq - right_sum * right_sum / right_n).max(0.0);

                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    let mut threshold = prev_x + (next_x - prev_x) / 2.0;
                    if threshold >= next_x {
                        threshold = prev_x;
                    }
                    best = Some(BestSplit { feature, threshold, sse });
                }
            }
        }

        best.filter(|b| b.sse < node_sse)
    }
}

/// Move every index satisfying `pred` to the front; returns the boundary.
fn partition(indices: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut boundary = 0;
    for i in 0..indices.len() {
        if pred(indices[i]) {
            indices.swap(boundary, i);
            boundary += 1;
        }
    }
    boundary
}
