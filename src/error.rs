//! Error types for the otofiyat crate

use thiserror::Error;

/// Result type alias using OtofiyatError
pub type Result<T> = std::result::Result<T, OtofiyatError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum OtofiyatError {
    /// Data loading or manipulation errors
    #[error("Data error: {0}")]
    DataError(String),

    /// Cleaning or encoding errors
    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    /// Model training errors
    #[error("Training error: {0}")]
    TrainingError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A categorical value never observed during training
    #[error("Unknown {field}: '{value}'. Valid {field}s: {}", .valid.join(", "))]
    UnknownCategory {
        field: String,
        value: String,
        valid: Vec<String>,
    },

    /// A persisted model or encoder file is absent
    #[error("Artifact not found at '{path}'. Run `otofiyat` or `otofiyat train` to produce it")]
    MissingArtifact { path: String },

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Shape mismatch errors
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    /// Column not found in DataFrame
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Model used before fitting
    #[error("Model has not been fitted yet")]
    ModelNotFitted,

    /// Invalid parameter value
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for OtofiyatError {
    fn from(err: polars::error::PolarsError) -> Self {
        OtofiyatError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for OtofiyatError {
    fn from(err: serde_json::Error) -> Self {
        OtofiyatError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for OtofiyatError {
    fn from(err: ndarray::ShapeError) -> Self {
        OtofiyatError::ShapeError {
            expected: "compatible dimensions".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<dialoguer::Error> for OtofiyatError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) => OtofiyatError::IoError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OtofiyatError::DataError("bad file".to_string());
        assert_eq!(err.to_string(), "Data error: bad file");

        let err = OtofiyatError::ModelNotFitted;
        assert_eq!(err.to_string(), "Model has not been fitted yet");
    }

    #[test]
    fn test_unknown_category_lists_valid_labels() {
        let err = OtofiyatError::UnknownCategory {
            field: "brand".to_string(),
            value: "Tesla".to_string(),
            valid: vec!["Fiat".to_string(), "Toyota".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Unknown brand: 'Tesla'"));
        assert!(msg.contains("Fiat, Toyota"));
    }

    #[test]
    fn test_missing_artifact_instructs_training() {
        let err = OtofiyatError::MissingArtifact {
            path: "output/model.json".to_string(),
        };
        assert!(err.to_string().contains("otofiyat train"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: OtofiyatError = io_err.into();
        assert!(matches!(err, OtofiyatError::IoError(_)));
    }
}
