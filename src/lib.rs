//! otofiyat - Used car price estimation
//!
//! This crate builds a synthetic used car market, cleans it, trains a set
//! of regression models and serves price estimates for the best one:
//! - Synthetic listing generation from a fixed brand/model catalog
//! - Data cleaning (nulls, outliers, duplicates) and label encoding
//! - Model training with automatic selection by test RMSE
//! - Persistence of the trained model and its encoders
//! - Single-car price prediction
//!
//! # Modules
//!
//! ## Data
//! - [`catalog`] - The fixed brand/model/package catalog and price rules
//! - [`generator`] - Synthetic listing generation
//! - [`dataset`] - Dataset persistence and summary statistics
//!
//! ## Modeling
//! - [`preprocessing`] - Cleaning and categorical encoding
//! - [`training`] - Candidate models, metrics and selection
//! - [`inference`] - Prediction over persisted artifacts
//!
//! ## Services
//! - [`cli`] - Command-line interface

pub mod error;

pub mod catalog;
pub mod dataset;
pub mod generator;

pub mod preprocessing;
pub mod training;
pub mod inference;

pub mod cli;

pub use error::{OtofiyatError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{OtofiyatError, Result};

    // Data
    pub use crate::dataset::{DatasetSummary, VehicleRecord};
    pub use crate::generator::{DataGenerator, GeneratorConfig};

    // Preprocessing
    pub use crate::preprocessing::{CleanConfig, DataCleaner, LabelEncoder, OutlierStrategy};

    // Training
    pub use crate::training::{ModelArtifact, TrainEngine, TrainingConfig};

    // Inference
    pub use crate::inference::{ArtifactPaths, Predictor, PriceQuery};
}
