//! Random forest regressor
//!
//! Bagging ensemble of regression trees. Trees train in parallel, each
//! seeded from the base seed plus its index, so results are identical
//! regardless of how rayon schedules the work.

use super::decision_tree::DecisionTreeRegressor;
use crate::error::{OtofiyatError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How many feature columns each tree sees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Square root of the feature count
    Sqrt,
    /// Log2 of the feature count
    Log2,
    /// Fraction of the feature count
    Fraction(f64),
    /// Fixed number
    Fixed(usize),
    /// All features
    All,
}

impl MaxFeatures {
    fn resolve(&self, n_features: usize) -> usize {
        match *self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil() as usize,
            MaxFeatures::Fraction(f) => (n_features as f64 * f).ceil() as usize,
            MaxFeatures::Fixed(n) => n,
            MaxFeatures::All => n_features,
        }
        .clamp(1, n_features)
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub random_state: Option<u64>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: Some(15),
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            random_state: Some(42),
        }
    }
}

impl RandomForestConfig {
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(OtofiyatError::InvalidParameter {
                name: "n_estimators".to_string(),
                value: "0".to_string(),
                reason: "forest needs at least one tree".to_string(),
            });
        }
        if let MaxFeatures::Fraction(f) = self.max_features {
            if !(f > 0.0 && f <= 1.0) {
                return Err(OtofiyatError::InvalidParameter {
                    name: "max_features".to_string(),
                    value: f.to_string(),
                    reason: "fraction must be in (0, 1]".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Random forest regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    config: RandomForestConfig,
    /// Fitted trees with the feature columns each was trained on
    trees: Vec<(DecisionTreeRegressor, Vec<usize>)>,
    n_features: usize,
    is_fitted: bool,
}

impl RandomForestRegressor {
    pub fn new(config: RandomForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fit the forest to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        self.config.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(OtofiyatError::TrainingError(
                "cannot fit a forest on an empty dataset".to_string(),
            ));
        }

        self.n_features = n_features;
        let n_cols = self.config.max_features.resolve(n_features);
        let base_seed = self.config.random_state.unwrap_or(42);

        let trees: Vec<(DecisionTreeRegressor, Vec<usize>)> = (0..self.config.n_estimators)
            .into_par_iter()
            .filter_map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                // Bootstrap sample with replacement
                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();

                let col_indices: Vec<usize> = if n_cols == n_features {
                    (0..n_features).collect()
                } else {
                    let mut cols: Vec<usize> = (0..n_features).collect();
                    cols.shuffle(&mut rng);
                    cols.truncate(n_cols);
                    cols.sort_unstable();
                    cols
                };

                let x_boot = x.select(Axis(0), &sample_indices).select(Axis(1), &col_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTreeRegressor::new()
                    .with_min_samples_split(self.config.min_samples_split)
                    .with_min_samples_leaf(self.config.min_samples_leaf);
                if let Some(depth) = self.config.max_depth {
                    tree = tree.with_max_depth(depth);
                }

                tree.fit(&x_boot, &y_boot).ok()?;
                Some((tree, col_indices))
            })
            .collect();

        if trees.is_empty() {
            return Err(OtofiyatError::TrainingError(
                "no tree could be fitted".to_string(),
            ));
        }

        self.trees = trees;
        self.is_fitted = true;
        Ok(self)
    }

    /// Predict by averaging all tree predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted || self.trees.is_empty() {
            return Err(OtofiyatError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(OtofiyatError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let per_tree: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|(tree, col_indices)| {
                let x_sub = x.select(Axis(1), col_indices);
                tree.predict(&x_sub)
            })
            .collect::<Result<Vec<_>>>()?;

        let n_trees = per_tree.len() as f64;
        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| per_tree.iter().map(|p| p[i]).sum::<f64>() / n_trees)
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Mean of the per-tree importances, mapped back to the full feature
    /// set and normalized to sum to one.
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut totals = vec![0.0; self.n_features];
        for (tree, col_indices) in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (j, &col) in col_indices.iter().enumerate() {
                    if j < imp.len() {
                        totals[col] += imp[j];
                    }
                }
            }
        }

        let total: f64 = totals.iter().sum();
        if total > 0.0 {
            for v in &mut totals {
                *v /= total;
            }
        }
        Some(Array1::from_vec(totals))
    }
}
