//! Synthetic record generation
//!
//! Draws uniform samples from the catalog's combination space and derives
//! a price per record:
//!
//! ```text
//! price = base_price * year_multiplier * package_multiplier * noise
//! ```
//!
//! with noise uniform in [0.93, 1.07) and the result rounded to the
//! nearest 10 000 TL. A fixed seed reproduces the exact record sequence.

use crate::catalog;
use crate::dataset::VehicleRecord;
use crate::error::{OtofiyatError, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lower bound of the market-variance noise factor
const NOISE_MIN: f64 = 0.93;

/// Upper bound of the market-variance noise factor
const NOISE_MAX: f64 = 1.07;

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of records to produce
    pub n_records: usize,
    /// Seed for the sampling and noise RNG
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_records: 10_000,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    pub fn new(n_records: usize) -> Self {
        Self {
            n_records,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_records == 0 {
            return Err(OtofiyatError::ConfigError(
                "record count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Seeded synthetic data generator over the fixed catalog
#[derive(Debug, Clone)]
pub struct DataGenerator {
    config: GeneratorConfig,
}

impl DataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce the configured number of records.
    pub fn generate(&self) -> Result<Vec<VehicleRecord>> {
        self.config.validate()?;

        let combinations = catalog::all_combinations();
        debug!("{} possible catalog combinations", combinations.len());

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut records = Vec::with_capacity(self.config.n_records);

        for _ in 0..self.config.n_records {
            let combo = &combinations[rng.gen_range(0..combinations.len())];
            let noise = rng.gen_range(NOISE_MIN..NOISE_MAX);

            let raw = combo.base_price * combo.year_multiplier * combo.package_multiplier * noise;

            records.push(VehicleRecord {
                year: combo.year,
                brand: combo.brand.to_string(),
                model: combo.model.to_string(),
                package: combo.package.to_string(),
                price: catalog::round_price(raw),
            });
        }

        info!(
            "generated {} records (seed {})",
            records.len(),
            self.config.seed
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_rejected() {
        let generator = DataGenerator::new(GeneratorConfig::new(0));
        assert!(matches!(
            generator.generate(),
            Err(OtofiyatError::ConfigError(_))
        ));
    }

    #[test]
    fn test_record_count() {
        let generator = DataGenerator::new(GeneratorConfig::new(500));
        let records = generator.generate().unwrap();
        assert_eq!(records.len(), 500);
    }

    #[test]
    fn test_prices_positive_and_years_in_range() {
        let records = DataGenerator::new(GeneratorConfig::new(2_000))
            .generate()
            .unwrap();

        for record in &records {
            assert!(record.price > 0, "non-positive price: {:?}", record);
            assert!(record.year >= catalog::YEAR_MIN && record.year <= catalog::YEAR_MAX);
            // Prices are quoted in 10 000 TL steps
            assert_eq!(record.price % 10_000, 0);
        }
    }

    #[test]
    fn test_records_match_catalog() {
        let records = DataGenerator::new(GeneratorConfig::new(300))
            .generate()
            .unwrap();

        for record in &records {
            let model = catalog::find_model(&record.brand, &record.model)
                .unwrap_or_else(|| panic!("record outside catalog: {:?}", record));
            assert!(model.packages.contains(&record.package.as_str()));
        }
    }

    #[test]
    fn test_same_seed_same_records() {
        let a = DataGenerator::new(GeneratorConfig::new(200).with_seed(7))
            .generate()
            .unwrap();
        let b = DataGenerator::new(GeneratorConfig::new(200).with_seed(7))
            .generate()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_records() {
        let a = DataGenerator::new(GeneratorConfig::new(200).with_seed(1))
            .generate()
            .unwrap();
        let b = DataGenerator::new(GeneratorConfig::new(200).with_seed(2))
            .generate()
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_price_within_formula_bounds() {
        let records = DataGenerator::new(GeneratorConfig::new(1_000))
            .generate()
            .unwrap();

        for record in &records {
            let model = catalog::find_model(&record.brand, &record.model).unwrap();
            let year_mult = catalog::year_multiplier(record.year).unwrap();
            let pkg_idx = model
                .packages
                .iter()
                .position(|p| *p == record.package)
                .unwrap();
            let pkg_mult = catalog::package_multiplier(pkg_idx, model.packages.len());

            let base = model.base_price * year_mult * pkg_mult;
            // Rounding to 10 000 can push slightly past the raw noise bounds
            let lo = base * NOISE_MIN - 5_000.0;
            let hi = base * NOISE_MAX + 5_000.0;
            let price = record.price as f64;
            assert!(price >= lo && price <= hi, "price outside noise band: {:?}", record);
        }
    }
}
