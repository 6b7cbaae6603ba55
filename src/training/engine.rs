//! Training engine
//!
//! Trains every candidate regressor on the same shuffled split, scores
//! each on the held-out rows and keeps the one with the lowest RMSE.
//! The winner is persisted as a [`ModelArtifact`] that prediction loads
//! without retraining.

use super::config::TrainingConfig;
use super::gradient_boosting::GradientBoostingRegressor;
use super::linear_models::LinearRegression;
use super::models::{ModelMetrics, TrainedModel};
use super::random_forest::RandomForestRegressor;
use crate::error::{OtofiyatError, Result};
use chrono::Utc;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// One scored candidate in the model comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub metrics: ModelMetrics,
}

/// The persisted winner of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_name: String,
    /// Feature order the model expects at prediction time
    pub feature_names: Vec<String>,
    pub metrics: ModelMetrics,
    /// RFC 3339 timestamp of the training run
    pub trained_at: String,
    pub model: TrainedModel,
}

impl ModelArtifact {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("saved {} model to {}", self.model_name, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                OtofiyatError::MissingArtifact {
                    path: path.display().to_string(),
                }
            } else {
                OtofiyatError::IoError(e)
            }
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.model.predict(x)
    }
}

/// Main training engine
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
    best: Option<TrainedModel>,
    best_metrics: Option<ModelMetrics>,
    leaderboard: Vec<LeaderboardEntry>,
    is_fitted: bool,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            best: None,
            best_metrics: None,
            leaderboard: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// All candidates with their held-out metrics, best first
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn best_model(&self) -> Option<&TrainedModel> {
        self.best.as_ref()
    }

    pub fn best_model_name(&self) -> Option<&str> {
        self.best.as_ref().map(|m| m.name())
    }

    /// Held-out metrics of the selected model
    pub fn metrics(&self) -> Option<&ModelMetrics> {
        self.best_metrics.as_ref()
    }

    /// Train all candidates and keep the one with the lowest RMSE
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.config.validate()?;

        let y = target_vector(df, &self.config.target_column)?;
        let x = feature_matrix(df, &self.config.feature_columns)?;

        let (x_train, x_test, y_train, y_test) =
            train_test_split(&x, &y, self.config.test_size, self.config.seed)?;
        info!(
            "split {} rows into {} train / {} test",
            x.nrows(),
            x_train.nrows(),
            x_test.nrows()
        );

        let candidates = vec![
            TrainedModel::Linear(LinearRegression::new()),
            TrainedModel::Forest(RandomForestRegressor::new(self.config.forest.clone())),
            TrainedModel::Boosting(GradientBoostingRegressor::new(self.config.boosting.clone())),
        ];

        let mut best: Option<(TrainedModel, ModelMetrics)> = None;
        let mut leaderboard = Vec::with_capacity(candidates.len());

        for mut model in candidates {
            let start = Instant::now();
            model.fit(&x_train, &y_train)?;

            let y_pred = model.predict(&x_test)?;
            let mut metrics = ModelMetrics::compute(&y_test, &y_pred)?;
            metrics.training_time_secs = start.elapsed().as_secs_f64();
            metrics.n_train = x_train.nrows();
            metrics.n_test = x_test.nrows();

            info!(
                "{}: RMSE {:.0}, MAE {:.0}, R2 {:.4} ({:.2}s)",
                model.name(),
                metrics.rmse,
                metrics.mae,
                metrics.r2,
                metrics.training_time_secs
            );

            leaderboard.push(LeaderboardEntry {
                name: model.name().to_string(),
                metrics: metrics.clone(),
            });

            // Strictly lower RMSE wins; ties keep the earlier candidate
            let better = best.as_ref().map_or(true, |(_, m)| metrics.rmse < m.rmse);
            if better {
                best = Some((model, metrics));
            }
        }

        leaderboard.sort_by(|a, b| {
            a.metrics
                .rmse
                .partial_cmp(&b.metrics.rmse)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let (model, metrics) = best.ok_or_else(|| {
            OtofiyatError::TrainingError("no candidate model could be trained".to_string())
        })?;
        info!("selected {} (RMSE {:.0})", model.name(), metrics.rmse);

        self.best = Some(model);
        self.best_metrics = Some(metrics);
        self.leaderboard = leaderboard;
        self.is_fitted = true;
        Ok(self)
    }

    /// Predict with the selected model on already-encoded features
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let model = self.best.as_ref().ok_or(OtofiyatError::ModelNotFitted)?;
        let x = feature_matrix(df, &self.config.feature_columns)?;
        model.predict(&x)
    }

    /// Persist the selected model together with its metadata
    pub fn save_model(&self, path: impl AsRef<Path>) -> Result<()> {
        let model = self.best.as_ref().ok_or(OtofiyatError::ModelNotFitted)?;
        let artifact = ModelArtifact {
            model_name: model.name().to_string(),
            feature_names: self.config.feature_columns.clone(),
            metrics: self.best_metrics.clone().unwrap_or_default(),
            trained_at: Utc::now().to_rfc3339(),
            model: model.clone(),
        };
        artifact.save(path)
    }
}

fn target_vector(df: &DataFrame, column: &str) -> Result<Array1<f64>> {
    let series = df
        .column(column)
        .map_err(|_| OtofiyatError::ColumnNotFound(column.to_string()))?;
    if series.null_count() > 0 {
        return Err(OtofiyatError::DataError(format!(
            "target column '{}' contains nulls",
            column
        )));
    }
    let values = series.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_no_null_iter().collect())
}

/// Extract named columns into a row-major matrix, one row per record
fn feature_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let col_data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| {
            let column = df
                .column(name)
                .map_err(|_| OtofiyatError::ColumnNotFound(name.clone()))?;
            if column.null_count() > 0 {
                return Err(OtofiyatError::DataError(format!(
                    "feature column '{}' contains nulls",
                    name
                )));
            }
            let values = column.cast(&DataType::Float64)?;
            Ok(values.f64()?.into_no_null_iter().collect())
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| {
        col_data[c][r]
    }))
}

fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
    let n = x.nrows();
    let n_test = ((n as f64) * test_size).round() as usize;
    if n_test == 0 || n_test >= n {
        return Err(OtofiyatError::TrainingError(format!(
            "cannot split {} rows with test_size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let x_train = x.select(Axis(0), train_idx);
    let x_test = x.select(Axis(0), test_idx);
    let y_train: Array1<f64> = Array1::from_vec(train_idx.iter().map(|&i| y[i]).collect());
    let y_test: Array1<f64> = Array1::from_vec(test_idx.iter().map(|&i| y[i]).collect());

    Ok((x_train, x_test, y_train, y_test))
}
