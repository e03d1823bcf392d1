//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Haul - See where the warehouse money goes
#[derive(Parser)]
#[command(name = "haul")]
#[command(about = "Warehouse receipt spend, fuel and price analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Abort when any receipt file cannot be read
    ///
    /// By default a bad file is reported and skipped, and the remaining
    /// files are still analysed.
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline totals for gas and merchandise
    Summary {
        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merchandise spend, top items, rewards and monthly trend
    Merch {
        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rows per item table (defaults to config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fuel spend, gallons and price per grade
    Gas {
        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Items whose price went up or down
    Prices {
        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rows per table (defaults to config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Look up an item by number or name
    Item {
        /// Item number or part of the description
        #[arg(short, long)]
        query: String,

        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Export the analysis
    Export {
        /// Receipt JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: json, csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
