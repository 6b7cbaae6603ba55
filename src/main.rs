//! otofiyat - Main Entry Point
//!
//! Used car price estimation over a synthetic market, with a full
//! pipeline default and per-stage subcommands.

use clap::Parser;
use otofiyat::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otofiyat=info".into()),
        )
        .init();

    let cli = Cli::parse();
    cli::run(cli)?;

    Ok(())
}
