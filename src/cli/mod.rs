//! Command-line interface
//!
//! Drives the full pipeline (generate, clean, train, predict) plus the
//! individual subcommands and the interactive pricing prompt.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::catalog;
use crate::dataset::{self, DatasetSummary};
use crate::error::{OtofiyatError, Result};
use crate::generator::{DataGenerator, GeneratorConfig};
use crate::inference::{ArtifactPaths, Predictor, PriceQuery};
use crate::preprocessing::{CleanReport, DataCleaner, LabelEncoder};
use crate::training::{TrainEngine, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}
fn bad(s: &str) -> ColoredString {
    s.truecolor(235, 110, 110)
}

fn line_box_top() {
    println!("  {}", dim("┌─────────────────────────────────────────────────────────────┐"));
}
fn line_box_bottom() {
    println!("  {}", dim("└─────────────────────────────────────────────────────────────┘"));
}
fn line_box_sep() {
    println!("  {}", dim("├─────────────────────────────────────────────────────────────┤"));
}

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() {
    line_box("");
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
            continue;
        }
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

/// Group digits of an amount: 1234567 -> "1,234,567"
fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn format_tl(n: i64) -> String {
    format!("{} TL", thousands(n))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "otofiyat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Used car price estimation on synthetic listings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory for the dataset and model artifacts
    #[arg(long, global = true, default_value = "output")]
    pub output_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a synthetic listings dataset
    Generate {
        /// Number of records
        #[arg(short, long, default_value_t = 10_000)]
        count: usize,

        /// Generator seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },

    /// Clean the dataset, train all candidates and keep the best
    Train {
        /// Dataset file (defaults to <output-dir>/cars.json)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Estimate the price of a single car
    Predict {
        year: i32,
        brand: String,
        model: String,
        package: String,
    },

    /// Price cars interactively from the catalog
    Interactive,
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let paths = ArtifactPaths::in_dir(&cli.output_dir);

    match cli.command {
        None => cmd_pipeline(&paths),
        Some(Commands::Generate { count, seed }) => cmd_generate(&paths, count, seed),
        Some(Commands::Train { data }) => cmd_train(&paths, data.as_deref()),
        Some(Commands::Predict { year, brand, model, package }) => {
            cmd_predict(&paths, PriceQuery::new(year, brand, model, package))
        }
        Some(Commands::Interactive) => cmd_interactive(&paths),
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

/// Default run: generate, train, show samples, then prompt
fn cmd_pipeline(paths: &ArtifactPaths) -> Result<()> {
    print_banner();

    section("Dataset");
    step_run("Generating listings");
    let start = Instant::now();
    let records = DataGenerator::new(GeneratorConfig::default()).generate()?;
    step_done(&format!("{} records in {:.2?}", records.len(), start.elapsed()));

    dataset::save_records(&records, &paths.data)?;
    step_ok(&format!("saved {}", paths.data.display()));
    print_summary(&DatasetSummary::compute(&records));

    let df = dataset::load_dataframe(&paths.data)?;
    let predictor = train_and_save(&df, paths)?;

    print_sample_predictions(&predictor);

    if std::io::stdin().is_terminal() {
        interactive_loop(&predictor)?;
    }
    Ok(())
}

fn cmd_generate(paths: &ArtifactPaths, count: usize, seed: u64) -> Result<()> {
    section("Generate");

    step_run(&format!("Generating {} listings", count));
    let start = Instant::now();
    let config = GeneratorConfig::new(count).with_seed(seed);
    let records = DataGenerator::new(config).generate()?;
    step_done(&format!("{:.2?}", start.elapsed()));

    dataset::save_records(&records, &paths.data)?;
    step_ok(&format!("saved {}", paths.data.display()));

    print_summary(&DatasetSummary::compute(&records));
    println!();
    Ok(())
}

fn cmd_train(paths: &ArtifactPaths, data: Option<&Path>) -> Result<()> {
    let data_path = data.unwrap_or(&paths.data);
    if !data_path.exists() {
        return Err(OtofiyatError::DataError(format!(
            "dataset not found at '{}'. Run `otofiyat generate` first",
            data_path.display()
        )));
    }

    section("Train");
    step_run(&format!("Loading {}", data_path.display()));
    let df = dataset::load_dataframe(data_path)?;
    step_done(&format!("{} rows", df.height()));

    train_and_save(&df, paths)?;
    println!();
    Ok(())
}

fn cmd_predict(paths: &ArtifactPaths, query: PriceQuery) -> Result<()> {
    let predictor = Predictor::load(paths)?;
    let price = predictor.predict(&query)?;

    section("Estimate");
    println!(
        "  {:<10} {}",
        muted("Car"),
        format!("{} {} {}", query.year, query.brand, query.model).white()
    );
    println!("  {:<10} {}", muted("Package"), query.package.white());
    println!("  {:<10} {}", muted("Model"), predictor.model_name());
    println!("  {:<10} {}", muted("Price"), format_tl(price).white().bold());
    println!();
    Ok(())
}

fn cmd_interactive(paths: &ArtifactPaths) -> Result<()> {
    let predictor = Predictor::load(paths)?;
    print_banner();
    println!("  {:<12} {}", muted("Model"), predictor.model_name());
    interactive_loop(&predictor)
}

// ─── Training flow ─────────────────────────────────────────────────────────────

/// Clean, encode, train and persist; returns a predictor over the new
/// artifacts.
fn train_and_save(df: &DataFrame, paths: &ArtifactPaths) -> Result<Predictor> {
    section("Training");

    step_run("Cleaning");
    let start = Instant::now();
    let (cleaned, report) = DataCleaner::default().clean(df)?;
    step_done(&format!("{:.2?}", start.elapsed()));
    print_clean_report(&report);

    step_run("Encoding labels");
    let mut encoder = LabelEncoder::new(&["brand", "model", "package"]);
    let encoded = encoder.fit_transform(&cleaned)?;
    step_done(&format!("{} columns", encoder.columns().len()));

    step_run("Training candidates");
    let start = Instant::now();
    let mut engine = TrainEngine::new(TrainingConfig::default());
    engine.fit(&encoded)?;
    step_done(&format!("{:.2?}", start.elapsed()));

    print_leaderboard(&engine);

    engine.save_model(&paths.model)?;
    encoder.save(&paths.encoders)?;
    step_ok(&format!("saved {}", paths.model.display()));
    step_ok(&format!("saved {}", paths.encoders.display()));

    Predictor::load(paths)
}

// ─── Output blocks ─────────────────────────────────────────────────────────────

fn print_banner() {
    let n_models: usize = catalog::CATALOG.iter().map(|b| b.models.len()).sum();

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "otofiyat".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv(
        "Catalog ",
        &format!("{} brands, {} models", catalog::CATALOG.len(), n_models),
    ));
    line_box(&kv(
        "Years   ",
        &format!("{} to {}", catalog::YEAR_MIN, catalog::YEAR_MAX),
    ));
    line_box_empty();
    line_box_bottom();
}

fn print_summary(summary: &DatasetSummary) {
    println!();
    println!("  {:<12} {}", muted("Records"), summary.n_records);
    println!(
        "  {:<12} {} brands, {} models",
        muted("Coverage"),
        summary.n_brands,
        summary.n_models
    );
    println!(
        "  {:<12} {} to {}",
        muted("Price range"),
        format_tl(summary.min_price),
        format_tl(summary.max_price)
    );
    println!("  {:<12} {}", muted("Mean price"), format_tl(summary.mean_price));
}

fn print_clean_report(report: &CleanReport) {
    println!(
        "  {:<12} {} -> {} rows",
        muted("Cleaned"),
        report.initial_rows,
        report.final_rows
    );
    if report.null_rows_dropped > 0 {
        println!("  {:<12} {} rows with nulls", muted("Dropped"), report.null_rows_dropped);
    }
    println!(
        "  {:<12} {} outside {} to {}",
        muted("Outliers"),
        report.outliers,
        format_tl(report.price_lower_bound.round() as i64),
        format_tl(report.price_upper_bound.round() as i64)
    );
    if report.duplicates_dropped > 0 {
        println!("  {:<12} {}", muted("Duplicates"), report.duplicates_dropped);
    }
}

fn print_leaderboard(engine: &TrainEngine) {
    println!();
    println!(
        "  {:<20} {:>12} {:>12} {:>8} {:>8}",
        muted("Model"),
        muted("RMSE"),
        muted("MAE"),
        muted("R²"),
        muted("Time")
    );
    println!("  {}", dim(&"─".repeat(64)));

    for entry in engine.leaderboard() {
        println!(
            "  {:<20} {:>12} {:>12} {:>8.4} {:>7.2}s",
            entry.name,
            thousands(entry.metrics.rmse.round() as i64),
            thousands(entry.metrics.mae.round() as i64),
            entry.metrics.r2,
            entry.metrics.training_time_secs
        );
    }
    println!("  {}", dim(&"─".repeat(64)));

    if let Some(name) = engine.best_model_name() {
        println!();
        println!("  {} {}", ok("best"), name.white().bold());
    }
}

const SAMPLE_QUERIES: &[(i32, &str, &str, &str)] = &[
    (2024, "Toyota", "Corolla", "Dream"),
    (2023, "Honda", "Civic", "Elegance"),
    (2024, "Volkswagen", "Passat", "Business"),
    (2025, "BMW", "3 Serisi", "M Sport"),
    (2024, "Hyundai", "Tucson", "Elite"),
    (2023, "Fiat", "Egea Sedan", "Urban"),
    (2024, "Mercedes-Benz", "C Serisi", "AMG"),
    (2025, "Renault", "Clio", "Icon"),
    (2024, "Dacia", "Duster", "Comfort"),
    (2022, "Skoda", "Octavia", "Style"),
];

fn print_sample_predictions(predictor: &Predictor) {
    section("Sample estimates");
    println!(
        "  {:<6} {:<14} {:<12} {:<14} {:>14}",
        muted("Year"),
        muted("Brand"),
        muted("Model"),
        muted("Package"),
        muted("Estimate")
    );
    println!("  {}", dim(&"─".repeat(64)));

    for &(year, brand, model, package) in SAMPLE_QUERIES {
        let query = PriceQuery::new(year, brand, model, package);
        match predictor.predict(&query) {
            Ok(price) => println!(
                "  {:<6} {:<14} {:<12} {:<14} {:>14}",
                year,
                brand,
                model,
                package,
                format_tl(price)
            ),
            Err(e) => println!(
                "  {:<6} {:<14} {:<12} {:<14} {}",
                year,
                brand,
                model,
                package,
                bad(&format!("err: {}", e))
            ),
        }
    }
    println!();
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn select_theme() -> dialoguer::theme::ColorfulTheme {
    use dialoguer::theme::ColorfulTheme;

    ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    }
}

fn interactive_loop(predictor: &Predictor) -> Result<()> {
    use dialoguer::Select;

    let theme = select_theme();

    section("Interactive pricing");
    println!("  {}", dim("esc or Quit to leave"));

    let mut brand_names: Vec<&str> = catalog::CATALOG.iter().map(|b| b.name).collect();
    brand_names.push("Quit");

    loop {
        println!();
        let brand_idx = match Select::with_theme(&theme)
            .with_prompt("Brand")
            .items(&brand_names)
            .default(0)
            .interact_opt()?
        {
            Some(idx) if idx < catalog::CATALOG.len() => idx,
            _ => break,
        };
        let brand = &catalog::CATALOG[brand_idx];

        let model_names: Vec<&str> = brand.models.iter().map(|m| m.name).collect();
        let model_idx = match Select::with_theme(&theme)
            .with_prompt("Model")
            .items(&model_names)
            .default(0)
            .interact_opt()?
        {
            Some(idx) => idx,
            None => continue,
        };
        let model = &brand.models[model_idx];

        let package_idx = match Select::with_theme(&theme)
            .with_prompt("Package")
            .items(model.packages)
            .default(0)
            .interact_opt()?
        {
            Some(idx) => idx,
            None => continue,
        };

        let years: Vec<String> = catalog::YEAR_MULTIPLIERS.iter().map(|(y, _)| y.to_string()).collect();
        let default_year = catalog::YEAR_MULTIPLIERS
            .iter()
            .position(|(y, _)| *y == 2024)
            .unwrap_or(0);
        let year_idx = match Select::with_theme(&theme)
            .with_prompt("Year")
            .items(&years)
            .default(default_year)
            .interact_opt()?
        {
            Some(idx) => idx,
            None => continue,
        };
        let year = catalog::YEAR_MULTIPLIERS[year_idx].0;

        let query = PriceQuery::new(year, brand.name, model.name, model.packages[package_idx]);
        match predictor.predict(&query) {
            Ok(price) => {
                println!();
                println!(
                    "  {} {} {} {} {}  {}",
                    ok("≈"),
                    query.year,
                    query.brand.white().bold(),
                    query.model.white(),
                    dim(&query.package),
                    format_tl(price).white().bold()
                );
            }
            Err(e) => println!("  {} {}", bad("×"), e),
        }
    }

    println!();
    println!("  {}", dim("goodbye"));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-45_000), "-45,000");
    }

    #[test]
    fn test_strip_ansi_removes_color_codes() {
        let colored = format!("{}", "hello".truecolor(1, 2, 3));
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn test_sample_queries_exist_in_catalog() {
        for &(year, brand, model, package) in SAMPLE_QUERIES {
            assert!(catalog::year_multiplier(year).is_some(), "{} out of range", year);
            let spec = catalog::find_model(brand, model)
                .unwrap_or_else(|| panic!("{} {} not in catalog", brand, model));
            assert!(
                spec.packages.contains(&package),
                "{} {} has no package {}",
                brand,
                model,
                package
            );
        }
    }
}
