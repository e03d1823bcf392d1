//! Haul CLI - Warehouse receipt analysis
//!
//! Usage:
//!   haul summary receipts.json            Headline totals
//!   haul merch 2024.json 2025.json        Merchandise breakdown
//!   haul gas receipts.json                Fuel breakdown
//!   haul prices receipts.json             Price increases and drops
//!   haul item --query coffee FILES        Item lookup
//!   haul export --format csv FILES        Export statistics

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let options = commands::LoadOptions {
        config: cli.config.as_deref(),
        strict: cli.strict,
    };

    match cli.command {
        Commands::Summary { files } => commands::cmd_summary(&files, &options),
        Commands::Merch { files, limit } => commands::cmd_merch(&files, &options, limit),
        Commands::Gas { files } => commands::cmd_gas(&files, &options),
        Commands::Prices { files, limit } => commands::cmd_prices(&files, &options, limit),
        Commands::Item { query, files } => commands::cmd_item(&files, &options, &query),
        Commands::Export {
            files,
            format,
            output,
        } => commands::cmd_export(&files, &options, &format, output.as_deref()),
    }
}
