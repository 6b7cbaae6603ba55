//! Gradient boosted regression trees
//!
//! Sequential ensemble starting from the target mean. Each round fits a
//! tree to the residuals of the running prediction and folds it in
//! scaled by the learning rate.

use super::decision_tree::DecisionTreeRegressor;
use crate::error::{OtofiyatError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Boosting hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Row fraction per round; 1.0 disables subsampling
    pub subsample: f64,
    pub random_state: Option<u64>,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            random_state: Some(42),
        }
    }
}

impl GradientBoostingConfig {
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_subsample(mut self, subsample: f64) -> Self {
        self.subsample = subsample;
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
                reason: "boosting needs at least one round".to_string(),
            });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(OtofiyatError::InvalidParameter {
                name: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(OtofiyatError::InvalidParameter {
                name: "subsample".to_string(),
                value: self.subsample.to_string(),
                reason: "must be in (0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Gradient boosting regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    config: GradientBoostingConfig,
    initial_prediction: f64,
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
    is_fitted: bool,
}

impl GradientBoostingRegressor {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            initial_prediction: 0.0,
            trees: Vec::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &GradientBoostingConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fit the boosting ensemble
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;

        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(OtofiyatError::TrainingError(
                "cannot fit boosting on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();
        self.initial_prediction = y.mean().unwrap_or(0.0);
        self.trees = Vec::with_capacity(self.config.n_estimators);

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let lr = self.config.learning_rate;
        let mut predictions = Array1::from_elem(n_samples, self.initial_prediction);

        for _ in 0..self.config.n_estimators {
            let residuals = y - &predictions;

            let mut tree = DecisionTreeRegressor::new()
                .with_max_depth(self.config.max_depth)
                .with_min_samples_split(self.config.min_samples_split)
                .with_min_samples_leaf(self.config.min_samples_leaf);

            if self.config.subsample < 1.0 {
                let sample_indices = self.subsample_indices(n_samples, &mut rng);
                let x_sub = x.select(Axis(0), &sample_indices);
                let r_sub: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| residuals[i]).collect());
                tree.fit(&x_sub, &r_sub)?;
            } else {
                tree.fit(x, &residuals)?;
            }

            // The running prediction advances on every row, including
            // rows left out of this round's subsample
            let tree_pred = tree.predict(x)?;
            predictions.zip_mut_with(&tree_pred, |p, t| *p += lr * t);

            self.trees.push(tree);
        }

        self.is_fitted = true;
        Ok(())
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(OtofiyatError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(OtofiyatError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let lr = self.config.learning_rate;
        let mut predictions = Array1::from_elem(x.nrows(), self.initial_prediction);
        for tree in &self.trees {
            let tree_pred = tree.predict(x)?;
            predictions.zip_mut_with(&tree_pred, |p, t| *p += lr * t);
        }
        Ok(predictions)
    }

    /// Accumulated per-tree importances, normalized to sum to one
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (i, &v) in imp.iter().enumerate() {
                    if i < totals.len() {
                        totals[i] += v;
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

    fn subsample_indices(&self, n: usize, rng: &mut Xoshiro256PlusPlus) -> Vec<usize> {
        let sample_size = (((n as f64) * self.config.subsample).ceil() as usize).max(1);
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        indices.truncate(sample_size);
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_config(n_estimators: usize) -> GradientBoostingConfig {
        GradientBoostingConfig::default()
            .with_n_estimators(n_estimators)
            .with_max_depth(3)
            .with_random_state(42)
    }

    #[test]
    fn test_fits_nonlinear_target() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y: Array1<f64> = x.column(0).iter().map(|v| v * v).collect();

        let mut model = GradientBoostingRegressor::new(small_config(50));
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        let mse = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / y.len() as f64;
        assert!(mse < 1.0, "MSE too high: {}", mse);
    }

    #[test]
    fn test_more_rounds_reduce_training_error() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![2.0, 9.0, 11.0, 30.0, 28.0, 45.0];

        let mse_for = |rounds: usize| {
            let mut model = GradientBoostingRegressor::new(small_config(rounds));
            model.fit(&x, &y).unwrap();
            let predictions = model.predict(&x).unwrap();
            predictions
                .iter()
                .zip(y.iter())
                .map(|(p, t)| (p - t).powi(2))
                .sum::<f64>()
                / y.len() as f64
        };

        assert!(mse_for(40) < mse_for(2));
    }

    #[test]
    fn test_deterministic_with_subsample() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let query = array![[2.5], [6.5]];

        let config = small_config(20).with_subsample(0.75);
        let mut a = GradientBoostingRegressor::new(config.clone());
        a.fit(&x, &y).unwrap();
        let mut b = GradientBoostingRegressor::new(config);
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&query).unwrap();
        let pb = b.predict(&query).unwrap();
        for (va, vb) in pa.iter().zip(pb.iter()) {
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = GradientBoostingRegressor::new(GradientBoostingConfig::default());
        let err = model.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, OtofiyatError::ModelNotFitted));
    }

    #[test]
    fn test_invalid_learning_rate_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        let mut model =
            GradientBoostingRegressor::new(small_config(5).with_learning_rate(0.0));
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_constant_target_predicts_mean() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];

        let mut model = GradientBoostingRegressor::new(small_config(10));
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&array![[99.0]]).unwrap();
        assert!((predictions[0] - 4.0).abs() < 1e-9);
    }
}
