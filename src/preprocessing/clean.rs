//! Dataset cleaning
//!
//! Applies the cleaning steps in a fixed order, each a pure
//! transformation of its input frame:
//!
//! 1. drop rows with missing values
//! 2. normalize dtypes (year to Int32, price to Float64)
//! 3. handle price outliers outside `[Q1 - f*IQR, Q3 + f*IQR]`
//! 4. drop exact duplicate rows
//!
//! Quantiles use linear interpolation over the sorted values.

use crate::error::{OtofiyatError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// How prices outside the IQR bounds are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierStrategy {
    /// Drop rows whose price falls outside the bounds
    Remove,
    /// Saturate prices to the bounds
    Clip,
}

impl Default for OutlierStrategy {
    fn default() -> Self {
        OutlierStrategy::Remove
    }
}

/// Cleaning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// IQR multiplier for the outlier bounds
    pub outlier_factor: f64,
    pub outlier_strategy: OutlierStrategy,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            outlier_factor: 1.5,
            outlier_strategy: OutlierStrategy::Remove,
        }
    }
}

impl CleanConfig {
    pub fn with_outlier_factor(mut self, factor: f64) -> Self {
        self.outlier_factor = factor;
        self
    }

    pub fn with_outlier_strategy(mut self, strategy: OutlierStrategy) -> Self {
        self.outlier_strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.outlier_factor.is_finite() || self.outlier_factor <= 0.0 {
            return Err(OtofiyatError::InvalidParameter {
                name: "outlier_factor".to_string(),
                value: self.outlier_factor.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }
}

/// What each cleaning step did, for reporting
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub initial_rows: usize,
    pub final_rows: usize,
    pub null_rows_dropped: usize,
    /// Prices outside the IQR bounds (removed or clipped per strategy)
    pub outliers: usize,
    pub duplicates_dropped: usize,
    pub price_lower_bound: f64,
    pub price_upper_bound: f64,
}

/// Applies the cleaning steps to a raw dataset frame
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleanConfig,
}

impl DataCleaner {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Run all cleaning steps and report what changed.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleanReport)> {
        self.config.validate()?;

        let mut report = CleanReport {
            initial_rows: df.height(),
            ..Default::default()
        };

        let df = drop_null_rows(df, &mut report)?;
        let df = normalize_dtypes(&df)?;
        let df = self.handle_outliers(&df, &mut report)?;
        let df = drop_duplicates(&df, &mut report)?;

        report.final_rows = df.height();
        info!(
            "cleaned {} -> {} rows ({} dropped)",
            report.initial_rows,
            report.final_rows,
            report.initial_rows - report.final_rows
        );
        Ok((df, report))
    }

    fn handle_outliers(&self, df: &DataFrame, report: &mut CleanReport) -> Result<DataFrame> {
        let price = df.column("price")?.f64()?;
        let values: Vec<f64> = price.into_iter().flatten().collect();
        if values.is_empty() {
            return Ok(df.clone());
        }

        let mut sorted = values;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = quantile_linear(&sorted, 0.25);
        let q3 = quantile_linear(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower = q1 - self.config.outlier_factor * iqr;
        let upper = q3 + self.config.outlier_factor * iqr;

        report.price_lower_bound = lower;
        report.price_upper_bound = upper;
        report.outliers = price
            .into_iter()
            .flatten()
            .filter(|&p| p < lower || p > upper)
            .count();
        debug!(
            "price IQR bounds: [{:.0}, {:.0}], {} outliers",
            lower, upper, report.outliers
        );

        if report.outliers == 0 {
            return Ok(df.clone());
        }

        match self.config.outlier_strategy {
            OutlierStrategy::Remove => {
                let keep: Vec<bool> = price
                    .into_iter()
                    .map(|v| v.map(|p| p >= lower && p <= upper).unwrap_or(false))
                    .collect();
                let mask = BooleanChunked::from_slice("keep".into(), &keep);
                Ok(df.filter(&mask)?)
            }
            OutlierStrategy::Clip => {
                let clipped: Float64Chunked = price
                    .into_iter()
                    .map(|v| v.map(|p| p.clamp(lower, upper)))
                    .collect();
                let mut out = df.clone();
                out.with_column(clipped.with_name("price".into()).into_series())?;
                Ok(out)
            }
        }
    }
}

fn drop_null_rows(df: &DataFrame, report: &mut CleanReport) -> Result<DataFrame> {
    let mut mask: Option<BooleanChunked> = None;
    for col in df.get_columns() {
        let not_null = col.as_materialized_series().is_not_null();
        mask = Some(match mask {
            Some(m) => &m & &not_null,
            None => not_null,
        });
    }

    let filtered = match mask {
        Some(m) => df.filter(&m)?,
        None => df.clone(),
    };
    report.null_rows_dropped = df.height() - filtered.height();
    Ok(filtered)
}

fn normalize_dtypes(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    let year = out.column("year")?.cast(&DataType::Int32)?;
    out.with_column(year)?;
    let price = out.column("price")?.cast(&DataType::Float64)?;
    out.with_column(price)?;
    Ok(out)
}

fn drop_duplicates(df: &DataFrame, report: &mut CleanReport) -> Result<DataFrame> {
    let before = df.height();
    let year = df.column("year")?.i32()?;
    let brand = df.column("brand")?.str()?;
    let model = df.column("model")?.str()?;
    let package = df.column("package")?.str()?;
    let price = df.column("price")?.f64()?;

    let mut seen = HashSet::with_capacity(before);
    let mut keep = Vec::with_capacity(before);
    for i in 0..before {
        let key = (
            year.get(i),
            brand.get(i),
            model.get(i),
            package.get(i),
            // f64 is not hashable; bit pattern is fine for exact duplicates
            price.get(i).map(f64::to_bits),
        );
        keep.push(seen.insert(key));
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = df.filter(&mask)?;
    report.duplicates_dropped = before - filtered.height();
    Ok(filtered)
}

/// Quantile with linear interpolation between the two nearest ranks.
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
