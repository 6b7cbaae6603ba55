//! Training configuration

use super::gradient_boosting::GradientBoostingConfig;
use super::random_forest::RandomForestConfig;
use crate::error::{OtofiyatError, Result};
use serde::{Deserialize, Serialize};

/// Settings for a model selection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub target_column: String,
    pub feature_columns: Vec<String>,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the train/test shuffle
    pub seed: u64,
    pub forest: RandomForestConfig,
    pub boosting: GradientBoostingConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_column: "price".to_string(),
            feature_columns: vec![
                "year".to_string(),
                "brand".to_string(),
                "model".to_string(),
                "package".to_string(),
            ],
            test_size: 0.2,
            seed: 42,
            forest: RandomForestConfig::default(),
            boosting: GradientBoostingConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    pub fn with_feature_columns(mut self, columns: &[&str]) -> Self {
        self.feature_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_forest(mut self, forest: RandomForestConfig) -> Self {
        self.forest = forest;
        self
    }

    pub fn with_boosting(mut self, boosting: GradientBoostingConfig) -> Self {
        self.boosting = boosting;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_columns.is_empty() {
            return Err(OtofiyatError::ConfigError(
                "feature_columns must not be empty".to_string(),
            ));
        }
        if self.feature_columns.iter().any(|c| c == &self.target_column) {
            return Err(OtofiyatError::ConfigError(format!(
                "target column '{}' cannot also be a feature",
                self.target_column
            )));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(OtofiyatError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must be strictly between 0 and 1".to_string(),
            });
        }
        self.forest.validate()?;
        self.boosting.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TrainingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_features_rejected() {
        let config = TrainingConfig::default().with_feature_columns(&[]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_in_features_rejected() {
        let config = TrainingConfig::default().with_feature_columns(&["year", "price"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_test_size_bounds() {
        assert!(TrainingConfig::default().with_test_size(0.0).validate().is_err());
        assert!(TrainingConfig::default().with_test_size(1.0).validate().is_err());
        assert!(TrainingConfig::default().with_test_size(0.3).validate().is_ok());
    }
}
