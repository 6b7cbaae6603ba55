//! Integration test: Cleaning and encoding end-to-end

use otofiyat::error::OtofiyatError;
use otofiyat::preprocessing::{DataCleaner, LabelEncoder};
use polars::prelude::*;

/// 20 regular listings plus one null row, one absurd price and one exact
/// duplicate of the first row.
fn listings_df() -> DataFrame {
    let brands = ["Toyota", "Honda", "Fiat", "Renault"];
    let models = ["Corolla", "Civic", "Egea Sedan", "Clio"];
    let packages = ["Vision", "Elegance", "Urban", "Joy"];

    let mut year: Vec<Option<i32>> = Vec::new();
    let mut brand: Vec<Option<&str>> = Vec::new();
    let mut model: Vec<Option<&str>> = Vec::new();
    let mut package: Vec<Option<&str>> = Vec::new();
    let mut price: Vec<Option<f64>> = Vec::new();

    for i in 0..20 {
        let b = i % 4;
        year.push(Some(2020 + (i % 6) as i32));
        brand.push(Some(brands[b]));
        model.push(Some(models[b]));
        package.push(Some(packages[i % 4]));
        price.push(Some(900_000.0 + 20_000.0 * i as f64));
    }

    // Missing price
    year.push(Some(2023));
    brand.push(Some("Toyota"));
    model.push(Some("Corolla"));
    package.push(Some("Vision"));
    price.push(None);

    // Far outside any reasonable IQR fence
    year.push(Some(2024));
    brand.push(Some("Honda"));
    model.push(Some("Civic"));
    package.push(Some("Elegance"));
    price.push(Some(50_000_000.0));

    // Exact duplicate of row 0
    year.push(Some(2020));
    brand.push(Some("Toyota"));
    model.push(Some("Corolla"));
    package.push(Some("Vision"));
    price.push(Some(900_000.0));

    df!(
        "year" => &year,
        "brand" => &brand,
        "model" => &model,
        "package" => &package,
        "price" => &price
    )
    .unwrap()
}

#[test]
fn test_clean_drops_nulls_outliers_and_duplicates() {
    let df = listings_df();
    let (cleaned, report) = DataCleaner::default().clean(&df).unwrap();

    assert_eq!(report.initial_rows, 23);
    assert_eq!(report.null_rows_dropped, 1, "the row with a missing price");
    assert_eq!(report.outliers, 1, "the 50M listing");
    assert_eq!(report.duplicates_dropped, 1, "the repeated first row");
    assert_eq!(report.final_rows, 20);
    assert_eq!(cleaned.height(), 20);

    assert!(report.price_upper_bound > report.price_lower_bound);
    assert!(50_000_000.0 > report.price_upper_bound);
}

#[test]
fn test_clean_is_idempotent() {
    let df = listings_df();
    let cleaner = DataCleaner::default();

    let (first, _) = cleaner.clean(&df).unwrap();
    let (second, report) = cleaner.clean(&first).unwrap();

    assert_eq!(second.height(), first.height(), "a clean frame stays intact");
    assert_eq!(report.null_rows_dropped, 0);
    assert_eq!(report.outliers, 0);
    assert_eq!(report.duplicates_dropped, 0);
}

#[test]
fn test_clean_then_encode_yields_numeric_frame() {
    let df = listings_df();
    let (cleaned, _) = DataCleaner::default().clean(&df).unwrap();

    let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
    let encoded = encoder.fit_transform(&cleaned).unwrap();

    assert_eq!(encoded.column("year").unwrap().dtype(), &DataType::Int32);
    assert_eq!(encoded.column("brand").unwrap().dtype(), &DataType::Int64);
    assert_eq!(encoded.column("model").unwrap().dtype(), &DataType::Int64);
    assert_eq!(encoded.column("package").unwrap().dtype(), &DataType::Int64);
    assert_eq!(encoded.column("price").unwrap().dtype(), &DataType::Float64);
    assert_eq!(encoded.height(), cleaned.height());
}

#[test]
fn test_encoder_assigns_codes_in_sorted_label_order() {
    let df = listings_df();
    let (cleaned, _) = DataCleaner::default().clean(&df).unwrap();

    let mut encoder = LabelEncoder::new(&["brand"]);
    encoder.fit(&cleaned).unwrap();

    assert_eq!(encoder.encode_value("brand", "Fiat").unwrap(), 0);
    assert_eq!(encoder.encode_value("brand", "Honda").unwrap(), 1);
    assert_eq!(encoder.encode_value("brand", "Renault").unwrap(), 2);
    assert_eq!(encoder.encode_value("brand", "Toyota").unwrap(), 3);
}

#[test]
fn test_encoder_file_roundtrip() {
    let df = listings_df();
    let (cleaned, _) = DataCleaner::default().clean(&df).unwrap();

    let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
    encoder.fit(&cleaned).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encoders.json");
    encoder.save(&path).unwrap();

    let loaded = LabelEncoder::load(&path).unwrap();
    for column in encoder.columns() {
        let labels = encoder.labels(column).unwrap();
        assert_eq!(loaded.labels(column).unwrap(), labels);
        for label in &labels {
            assert_eq!(
                loaded.encode_value(column, label).unwrap(),
                encoder.encode_value(column, label).unwrap(),
                "code for {label} must survive the roundtrip"
            );
        }
    }
}

#[test]
fn test_unknown_label_is_reported() {
    let df = listings_df();
    let (cleaned, _) = DataCleaner::default().clean(&df).unwrap();

    let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
    encoder.fit(&cleaned).unwrap();

    let unseen = df!(
        "year" => &[2024i32],
        "brand" => &["Tesla"],
        "model" => &["Model 3"],
        "package" => &["Long Range"],
        "price" => &[2_000_000.0]
    )
    .unwrap();

    let err = encoder.transform(&unseen).unwrap_err();
    assert!(matches!(err, OtofiyatError::UnknownCategory { .. }));
    let message = err.to_string();
    assert!(message.contains("Tesla"), "message should name the value: {message}");
    assert!(message.contains("brand"), "message should name the field: {message}");
}
