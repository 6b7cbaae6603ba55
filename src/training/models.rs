//! Evaluation metrics and the candidate model wrapper

use super::gradient_boosting::GradientBoostingRegressor;
use super::linear_models::LinearRegression;
use super::random_forest::RandomForestRegressor;
use crate::error::{OtofiyatError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Regression metrics on the held-out split
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// R-squared
    pub r2: f64,
    /// Training time in seconds
    pub training_time_secs: f64,
    pub n_train: usize,
    pub n_test: usize,
}

impl ModelMetrics {
    /// Compute regression metrics from true and predicted values
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(OtofiyatError::TrainingError(
                "cannot evaluate on an empty split".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.sum() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e * e).sum();
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Ok(Self {
            rmse: mse.sqrt(),
            mae,
            r2,
            training_time_secs: 0.0,
            n_train: 0,
            n_test: 0,
        })
    }
}

/// A candidate regressor, dispatching on the concrete model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrainedModel {
    Linear(LinearRegression),
    Forest(RandomForestRegressor),
    Boosting(GradientBoostingRegressor),
}

impl TrainedModel {
    /// Human-readable model name for leaderboards and logs
    pub fn name(&self) -> &'static str {
        match self {
            TrainedModel::Linear(_) => "Linear Regression",
            TrainedModel::Forest(_) => "Random Forest",
            TrainedModel::Boosting(_) => "Gradient Boosting",
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            TrainedModel::Linear(m) => m.fit(x, y).map(|_| ()),
            TrainedModel::Forest(m) => m.fit(x, y).map(|_| ()),
            TrainedModel::Boosting(m) => m.fit(x, y),
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TrainedModel::Linear(m) => m.predict(x),
            TrainedModel::Forest(m) => m.predict(x),
            TrainedModel::Boosting(m) => m.predict(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let metrics = ModelMetrics::compute(&y, &y).unwrap();

        assert!(metrics.rmse.abs() < 1e-12);
        assert!(metrics.mae.abs() < 1e-12);
        assert!((metrics.r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_errors() {
        let y_true = array![2.0, 4.0, 6.0];
        let y_pred = array![1.0, 4.0, 8.0]; // errors 1, 0, -2

        let metrics = ModelMetrics::compute(&y_true, &y_pred).unwrap();
        assert!((metrics.mae - 1.0).abs() < 1e-12);
        assert!((metrics.rmse - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target_r2_zero() {
        let y_true = array![3.0, 3.0, 3.0];
        let y_pred = array![2.0, 3.0, 4.0];

        let metrics = ModelMetrics::compute(&y_true, &y_pred).unwrap();
        assert_eq!(metrics.r2, 0.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let y_true = array![1.0, 2.0];
        let y_pred = array![1.0, 2.0, 3.0];
        assert!(ModelMetrics::compute(&y_true, &y_pred).is_err());
    }

    #[test]
    fn test_model_names() {
        let model = TrainedModel::Linear(LinearRegression::new());
        assert_eq!(model.name(), "Linear Regression");
    }
}
