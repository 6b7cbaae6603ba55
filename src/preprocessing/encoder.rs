//! Label encoding for categorical columns
//!
//! Each configured column gets an integer code per distinct label,
//! assigned in sorted label order so the mapping is stable across runs
//! over the same data. The fitted mappings persist alongside the model
//! so predictions use the exact codes seen during training.

use crate::error::{OtofiyatError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Maps string labels to integer codes, one mapping per column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    columns: Vec<String>,
    mappings: BTreeMap<String, BTreeMap<String, i64>>,
    is_fitted: bool,
}

impl LabelEncoder {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            mappings: BTreeMap::new(),
            is_fitted: false,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learn a code for every distinct label in each configured column.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.mappings.clear();
        for column in &self.columns {
            let values = df.column(column)?.str()?;
            let labels: BTreeSet<&str> = values.into_iter().flatten().collect();
            let mapping: BTreeMap<String, i64> = labels
                .into_iter()
                .enumerate()
                .map(|(code, label)| (label.to_string(), code as i64))
                .collect();
            info!("encoded '{}': {} distinct labels", column, mapping.len());
            self.mappings.insert(column.clone(), mapping);
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each configured column with its integer codes.
    ///
    /// Labels not seen during fit are an error, as are nulls; cleaning
    /// runs before encoding and removes incomplete rows.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(OtofiyatError::ModelNotFitted);
        }

        let mut out = df.clone();
        for column in &self.columns {
            let mapping = self.mapping(column)?;
            let values = out.column(column)?.str()?;

            let mut codes = Vec::with_capacity(values.len());
            for value in values {
                let label = value.ok_or_else(|| {
                    OtofiyatError::PreprocessingError(format!(
                        "null value in column '{}' during encoding",
                        column
                    ))
                })?;
                let code = mapping
                    .get(label)
                    .copied()
                    .ok_or_else(|| self.unknown(column, label))?;
                codes.push(code);
            }
            out.with_column(Series::new(column.as_str().into(), codes))?;
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Code for a single label, used when encoding prediction queries.
    pub fn encode_value(&self, column: &str, label: &str) -> Result<i64> {
        if !self.is_fitted {
            return Err(OtofiyatError::ModelNotFitted);
        }
        let mapping = self.mapping(column)?;
        mapping
            .get(label)
            .copied()
            .ok_or_else(|| self.unknown(column, label))
    }

    /// All labels the encoder knows for a column, in code order.
    pub fn labels(&self, column: &str) -> Result<Vec<String>> {
        let mapping = self.mapping(column)?;
        Ok(mapping.keys().cloned().collect())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("saved encoders to {}", path.display());
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

    fn mapping(&self, column: &str) -> Result<&BTreeMap<String, i64>> {
        self.mappings
            .get(column)
            .ok_or_else(|| OtofiyatError::ColumnNotFound(column.to_string()))
    }

    fn unknown(&self, column: &str, label: &str) -> OtofiyatError {
        let valid = self
            .mappings
            .get(column)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        OtofiyatError::UnknownCategory {
            field: column.to_string(),
            value: label.to_string(),
            valid,
        }
    }
}
