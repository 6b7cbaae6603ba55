//! Price prediction from persisted artifacts
//!
//! Loads the model and encoder files a training run leaves behind and
//! serves single-query predictions without retraining. Categorical
//! fields are encoded with the exact mappings used during training, so
//! a label the model never saw is an error rather than a guess.

mod query;

pub use query::PriceQuery;

use crate::catalog;
use crate::error::{OtofiyatError, Result};
use crate::preprocessing::LabelEncoder;
use crate::training::{ModelArtifact, ModelMetrics};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the files a training run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub data: PathBuf,
    pub model: PathBuf,
    pub encoders: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir("output")
    }
}

impl ArtifactPaths {
    /// Standard file names under the given directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data: dir.join("cars.json"),
            model: dir.join("model.json"),
            encoders: dir.join("encoders.json"),
        }
    }
}

/// Serves price predictions from a trained model and its encoders
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
    encoder: LabelEncoder,
}

impl Predictor {
    /// Load a predictor from persisted artifacts
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let artifact = ModelArtifact::load(&paths.model)?;
        let encoder = LabelEncoder::load(&paths.encoders)?;
        info!(
            "loaded {} model trained at {}",
            artifact.model_name, artifact.trained_at
        );
        Ok(Self::from_parts(artifact, encoder))
    }

    pub fn from_parts(artifact: ModelArtifact, encoder: LabelEncoder) -> Self {
        Self { artifact, encoder }
    }

    pub fn model_name(&self) -> &str {
        &self.artifact.model_name
    }

    /// Held-out metrics recorded when the model was selected
    pub fn metrics(&self) -> &ModelMetrics {
        &self.artifact.metrics
    }

    /// Labels the encoder accepts for a categorical field, in code order
    pub fn known_labels(&self, field: &str) -> Result<Vec<String>> {
        self.encoder.labels(field)
    }

    /// Estimate the price of one car, rounded to the catalog price step
    pub fn predict(&self, query: &PriceQuery) -> Result<i64> {
        let mut row = Vec::with_capacity(self.artifact.feature_names.len());
        for name in &self.artifact.feature_names {
            let value = match name.as_str() {
                "year" => query.year as f64,
                "brand" => self.encoder.encode_value("brand", &query.brand)? as f64,
                "model" => self.encoder.encode_value("model", &query.model)? as f64,
                "package" => self.encoder.encode_value("package", &query.package)? as f64,
                other => return Err(OtofiyatError::ColumnNotFound(other.to_string())),
            };
            row.push(value);
        }

        let x = Array2::from_shape_vec((1, row.len()), row)?;
        let predictions = self.artifact.predict(&x)?;
        Ok(catalog::round_price(predictions[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{LinearRegression, TrainedModel};
    use ndarray::array;
    use polars::prelude::*;

    fn fitted_predictor() -> Predictor {
        // year, brand, model, package codes with a linear price
        let x = array![
            [2020.0, 0.0, 0.0, 0.0],
            [2021.0, 0.0, 1.0, 1.0],
            [2022.0, 1.0, 0.0, 0.0],
            [2023.0, 1.0, 1.0, 1.0],
            [2024.0, 0.0, 0.0, 1.0],
            [2025.0, 1.0, 1.0, 0.0],
        ];
        let y = array![
            500_000.0, 560_000.0, 640_000.0, 700_000.0, 660_000.0, 760_000.0
        ];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let df = DataFrame::new(vec![
            Column::new("brand".into(), &["Fiat", "Toyota"]),
            Column::new("model".into(), &["Egea", "Corolla"]),
            Column::new("package".into(), &["Base", "Lux"]),
        ])
        .unwrap();
        let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
        encoder.fit(&df).unwrap();

        let artifact = ModelArtifact {
            model_name: "Linear Regression".to_string(),
            feature_names: vec![
                "year".to_string(),
                "brand".to_string(),
                "model".to_string(),
                "package".to_string(),
            ],
            metrics: ModelMetrics::default(),
            trained_at: "2025-01-01T00:00:00+00:00".to_string(),
            model: TrainedModel::Linear(model),
        };
        Predictor::from_parts(artifact, encoder)
    }

    #[test]
    fn test_predict_returns_rounded_price() {
        let predictor = fitted_predictor();
        let query = PriceQuery::new(2023, "Toyota", "Corolla", "Lux");

        let price = predictor.predict(&query).unwrap();
        assert!(price > 0);
        assert_eq!(price % 10_000, 0);
    }

    #[test]
    fn test_unknown_brand_is_rejected() {
        let predictor = fitted_predictor();
        let query = PriceQuery::new(2023, "Tesla", "Corolla", "Lux");

        let err = predictor.predict(&query).unwrap_err();
        match err {
            OtofiyatError::UnknownCategory { field, value, valid } => {
                assert_eq!(field, "brand");
                assert_eq!(value, "Tesla");
                assert!(valid.contains(&"Toyota".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_known_labels_in_code_order() {
        let predictor = fitted_predictor();
        assert_eq!(predictor.known_labels("brand").unwrap(), vec!["Fiat", "Toyota"]);
    }

    #[test]
    fn test_load_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = Predictor::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, OtofiyatError::MissingArtifact { .. }));
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.model, PathBuf::from("output/model.json"));
        assert_eq!(paths.encoders, PathBuf::from("output/encoders.json"));
        assert_eq!(paths.data, PathBuf::from("output/cars.json"));
    }
}
