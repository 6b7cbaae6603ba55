use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use otofiyat::dataset;
use otofiyat::generator::{DataGenerator, GeneratorConfig};
use otofiyat::preprocessing::{DataCleaner, LabelEncoder};
use otofiyat::training::{
    GradientBoostingConfig, RandomForestConfig, TrainEngine, TrainingConfig,
};
use polars::prelude::*;

/// Ready-to-train frame: generated listings, cleaned and label encoded.
fn encoded_listings(n: usize) -> DataFrame {
    let records = DataGenerator::new(GeneratorConfig::new(n).with_seed(42))
        .generate()
        .unwrap();
    let df = dataset::records_to_dataframe(&records).unwrap();
    let (cleaned, _) = DataCleaner::default().clean(&df).unwrap();

    let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
    encoder.fit_transform(&cleaned).unwrap()
}

fn bench_config() -> TrainingConfig {
    TrainingConfig::default()
        .with_forest(RandomForestConfig::default().with_n_estimators(50).with_max_depth(10))
        .with_boosting(GradientBoostingConfig::default().with_n_estimators(50).with_max_depth(4))
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for n_records in [1_000, 10_000, 50_000].iter() {
        let generator = DataGenerator::new(GeneratorConfig::new(*n_records).with_seed(42));

        group.bench_with_input(
            BenchmarkId::new("generate", n_records),
            &generator,
            |b, generator| b.iter(|| black_box(generator).generate().unwrap()),
        );
    }

    group.finish();
}

fn bench_cleaning(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleaning");

    for n_records in [1_000, 10_000].iter() {
        let records = DataGenerator::new(GeneratorConfig::new(*n_records).with_seed(42))
            .generate()
            .unwrap();
        let df = dataset::records_to_dataframe(&records).unwrap();
        let cleaner = DataCleaner::default();

        group.bench_with_input(BenchmarkId::new("clean", n_records), &df, |b, df| {
            b.iter(|| cleaner.clean(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10); // Fewer samples for training benchmarks

    for n_rows in [500, 2_000].iter() {
        let df = encoded_listings(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &df, |b, df| {
            b.iter(|| {
                let mut engine = TrainEngine::new(bench_config());
                engine.fit(black_box(df)).unwrap();
                engine
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    // Train once on a mid-size frame
    let train_df = encoded_listings(2_000);
    let mut engine = TrainEngine::new(bench_config());
    engine.fit(&train_df).unwrap();

    for n_rows in [100, 1_000, 5_000].iter() {
        let test_df = encoded_listings(*n_rows);

        group.bench_with_input(BenchmarkId::new("predict", n_rows), &test_df, |b, df| {
            b.iter(|| engine.predict(black_box(df)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_cleaning, bench_training, bench_prediction);
criterion_main!(benches);
