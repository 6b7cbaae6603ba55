//! Regression decision tree
//!
//! CART-style binary tree that greedily minimizes within-node variance.
//! Serves as the weak learner for both the bagging and boosting
//! ensembles, and serializes with the rest of the model artifact.

use crate::error::{OtofiyatError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Splits with a variance gain at or below this are not worth taking.
const MIN_GAIN: f64 = 1e-12;

/// Nodes with target variance below this are treated as pure.
const PURITY_EPSILON: f64 = 1e-10;

/// A node in the fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

impl TreeNode {
    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn count_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.count_leaves() + right.count_leaves(),
        }
    }
}

/// Decision tree regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    root: Option<TreeNode>,
    n_features: usize,
    feature_importances: Option<Vec<f64>>,
    is_fitted: bool,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            root: None,
            n_features: 0,
            feature_importances: None,
            is_fitted: false,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(OtofiyatError::TrainingError(
                "cannot fit a tree on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();
        let mut importances = vec![0.0; self.n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_node(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(importances);
        self.is_fitted = true;

        Ok(self)
    }

    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let (mean, variance) = mean_variance(y, indices);

        let should_stop = self.max_depth.map_or(false, |d| depth >= d)
            || n_samples < self.min_samples_split
            || variance < PURITY_EPSILON;
        if should_stop {
            return TreeNode::Leaf { value: mean, n_samples };
        }

        match self.find_best_split(x, y, indices) {
            Some((feature_idx, threshold, gain)) => {
                importances[feature_idx] += n_samples as f64 * gain;

                let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[[i, feature_idx]] <= threshold);

                let left = Box::new(self.build_node(x, y, &left_indices, depth + 1, importances));
                let right = Box::new(self.build_node(x, y, &right_indices, depth + 1, importances));

                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    n_samples,
                }
            }
            None => TreeNode::Leaf { value: mean, n_samples },
        }
    }

    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let n = indices.len() as f64;
        let (sum, sq_sum) = indices
            .iter()
            .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]));
        let parent_impurity = impurity(sq_sum, sum, n);

        // Each feature scans independently; candidates reduce to the best gain
        (0..x.ncols())
            .into_par_iter()
            .filter_map(|feature_idx| self.scan_feature(x, y, indices, feature_idx, parent_impurity))
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Single pass over one feature: sort samples by value, then slide the
    /// split point left to right keeping running sums on both sides.
    fn scan_feature(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        feature_idx: usize,
        parent_impurity: f64,
    ) -> Option<(usize, f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[[i, feature_idx]], y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let n = pairs.len();
        let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
        let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut best: Option<(f64, f64)> = None;

        for i in 0..n - 1 {
            left_sum += pairs[i].1;
            left_sq += pairs[i].1 * pairs[i].1;

            // No threshold exists between equal feature values
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }

            let left_count = i + 1;
            let right_count = n - left_count;
            if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                continue;
            }

            let left_impurity = impurity(left_sq, left_sum, left_count as f64);
            let right_impurity = impurity(
                total_sq - left_sq,
                total_sum - left_sum,
                right_count as f64,
            );
            let weighted = (left_count as f64 * left_impurity
                + right_count as f64 * right_impurity)
                / n as f64;

            let gain = parent_impurity - weighted;
            if gain > best.map_or(MIN_GAIN, |(_, g)| g) {
                best = Some(((pairs[i].0 + pairs[i + 1].0) / 2.0, gain));
            }
        }

        best.map(|(threshold, gain)| (feature_idx, threshold, gain))
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(OtofiyatError::ModelNotFitted)?;
        if x.ncols() != self.n_features {
            return Err(OtofiyatError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let mut node = root;
                loop {
                    match node {
                        TreeNode::Leaf { value, .. } => break *value,
                        TreeNode::Split {
                            feature_idx,
                            threshold,
                            left,
                            right,
                            ..
                        } => {
                            node = if x[[i, *feature_idx]] <= *threshold { left } else { right };
                        }
                    }
                }
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Normalized variance-reduction importances, one entry per feature
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::count_leaves)
    }
}

fn mean_variance(y: &Array1<f64>, indices: &[usize]) -> (f64, f64) {
    if indices.is_empty() {
        return (0.0, 0.0);
    }
    let n = indices.len() as f64;
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n;
    let variance = indices.iter().map(|&i| (y[i] - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

/// Population variance from running sums: E[y^2] - E[y]^2
fn impurity(sq_sum: f64, sum: f64, n: f64) -> f64 {
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}
