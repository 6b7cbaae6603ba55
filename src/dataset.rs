//! Dataset persistence and summaries
//!
//! Vehicle records are stored on disk as a pretty-printed JSON array and
//! loaded back either as typed records or as a polars DataFrame for the
//! preprocessing pipeline.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// One synthetic vehicle listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub year: i32,
    pub brand: String,
    pub model: String,
    pub package: String,
    pub price: i64,
}

/// Save records as a JSON array, creating parent directories as needed.
pub fn save_records(records: &[VehicleRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!("{} records saved to '{}'", records.len(), path.display());
    Ok(())
}

/// Load typed records from a JSON array file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<VehicleRecord>> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a dataset file into a DataFrame with columns
/// `year, brand, model, package, price`.
pub fn load_dataframe(path: impl AsRef<Path>) -> Result<DataFrame> {
    let file = fs::File::open(path.as_ref())?;
    let df = JsonReader::new(BufReader::new(file)).finish()?;
    Ok(df)
}

/// Build a DataFrame from in-memory records without touching disk.
pub fn records_to_dataframe(records: &[VehicleRecord]) -> Result<DataFrame> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let brands: Vec<&str> = records.iter().map(|r| r.brand.as_str()).collect();
    let models: Vec<&str> = records.iter().map(|r| r.model.as_str()).collect();
    let packages: Vec<&str> = records.iter().map(|r| r.package.as_str()).collect();
    let prices: Vec<i64> = records.iter().map(|r| r.price).collect();

    let df = DataFrame::new(vec![
        Column::new("year".into(), years),
        Column::new("brand".into(), brands),
        Column::new("model".into(), models),
        Column::new("package".into(), packages),
        Column::new("price".into(), prices),
    ])?;
    Ok(df)
}

/// Headline figures for a generated dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub n_records: usize,
    pub n_brands: usize,
    pub n_models: usize,
    pub min_price: i64,
    pub max_price: i64,
    pub mean_price: i64,
}

impl DatasetSummary {
    pub fn compute(records: &[VehicleRecord]) -> Self {
        let brands: HashSet<&str> = records.iter().map(|r| r.brand.as_str()).collect();
        let models: HashSet<&str> = records.iter().map(|r| r.model.as_str()).collect();
        let min_price = records.iter().map(|r| r.price).min().unwrap_or(0);
        let max_price = records.iter().map(|r| r.price).max().unwrap_or(0);
        let total: i64 = records.iter().map(|r| r.price).sum();
        let mean_price = if records.is_empty() {
            0
        } else {
            total / records.len() as i64
        };

        Self {
            n_records: records.len(),
            n_brands: brands.len(),
            n_models: models.len(),
            min_price,
            max_price,
            mean_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<VehicleRecord> {
        vec![
            VehicleRecord {
                year: 2024,
                brand: "Toyota".to_string(),
                model: "Corolla".to_string(),
                package: "Dream".to_string(),
                price: 1_250_000,
            },
            VehicleRecord {
                year: 2023,
                brand: "Fiat".to_string(),
                model: "Egea Sedan".to_string(),
                package: "Urban".to_string(),
                price: 790_000,
            },
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");

        let records = sample_records();
        save_records(&records, &path).unwrap();

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_load_dataframe_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");

        save_records(&sample_records(), &path).unwrap();
        let df = load_dataframe(&path).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 5);
        assert!(df.column("price").is_ok());
    }

    #[test]
    fn test_records_to_dataframe() {
        let df = records_to_dataframe(&sample_records()).unwrap();
        assert_eq!(df.height(), 2);

        let brands = df.column("brand").unwrap().str().unwrap();
        assert_eq!(brands.get(0), Some("Toyota"));
    }

    #[test]
    fn test_summary() {
        let summary = DatasetSummary::compute(&sample_records());
        assert_eq!(summary.n_records, 2);
        assert_eq!(summary.n_brands, 2);
        assert_eq!(summary.n_models, 2);
        assert_eq!(summary.min_price, 790_000);
        assert_eq!(summary.max_price, 1_250_000);
        assert_eq!(summary.mean_price, 1_020_000);
    }

    #[test]
    fn test_summary_empty() {
        let summary = DatasetSummary::compute(&[]);
        assert_eq!(summary.n_records, 0);
        assert_eq!(summary.mean_price, 0);
    }
}
