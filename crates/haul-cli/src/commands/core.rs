//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_analysis` - Shared utility to resolve config, read files and analyse
//! - `cmd_summary` - Headline totals for both aggregates

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use haul_core::format::format_money;
use haul_core::{analyze, load_files, Analysis, BatchPolicy, Config};
use tracing::debug;

/// Global options shared by every command
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadOptions<'a> {
    pub config: Option<&'a Path>,
    pub strict: bool,
}

/// Resolve config, load every receipt file and run the analysis.
///
/// Unreadable files are reported and skipped unless strict mode is on
/// (flag or config), in which case the first one aborts the run.
pub fn load_analysis(files: &[PathBuf], options: &LoadOptions) -> Result<(Analysis, Config)> {
    let mut config = Config::load(options.config).context("Failed to load config")?;
    if options.strict {
        config.batch_policy = BatchPolicy::FailFast;
    }
    debug!("Using {:?} with {} file(s)", config.batch_policy, files.len());

    let batch =
        load_files(files, config.batch_policy).context("Failed to load receipt files")?;

    for failure in &batch.failures {
        eprintln!(
            "⚠️  Skipped {}: {}",
            failure.path.display(),
            failure.error
        );
    }
    if batch.loaded.is_empty() && !files.is_empty() {
        anyhow::bail!("None of the {} receipt file(s) could be read", files.len());
    }

    Ok((analyze(&batch.receipts), config))
}

pub fn cmd_summary(files: &[PathBuf], options: &LoadOptions) -> Result<()> {
    let (analysis, _) = load_analysis(files, options)?;
    print_summary(&analysis);
    Ok(())
}

/// Headline cards shared by the summary and merchandise views
pub fn print_summary(analysis: &Analysis) {
    println!();
    println!("🧾 Receipt Summary ({})", analysis.date_range);
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.is_empty() {
        println!("   No receipts found.");
        print_notes(analysis);
        return;
    }

    let merch = &analysis.merch;
    let gas = &analysis.gas;

    println!("   Merchandise:");
    println!("     Net spend:        {}", format_money(merch.total_spent));
    println!("     Visits:           {}", merch.visits());
    println!("     Avg per visit:    {}", format_money(merch.average_per_visit()));
    println!("     Items bought:     {:.0}", merch.total_units);
    println!(
        "     Refunds:          {} ({})",
        merch.refund_count,
        format_money(merch.refund_total)
    );
    println!("     Taxes:            {}", format_money(merch.total_taxes));
    println!("     Instant savings:  {}", format_money(merch.instant_savings));
    println!();
    println!("   Gas:");
    println!("     Spend:            {}", format_money(gas.total_spent));
    println!("     Visits:           {}", gas.visits);
    println!("     Gallons:          {:.2}", gas.total_gallons);
    println!(
        "     Avg price/gal:    {}",
        format_money(gas.average_price_per_gallon)
    );
    println!();
    println!(
        "   Estimated rewards:  {}",
        format_money(analysis.rewards.total)
    );
    println!("   Locations:          {}", analysis.all_locations.len());

    print_notes(analysis);
}

fn print_notes(analysis: &Analysis) {
    if analysis.duplicate_receipts > 0 {
        println!();
        println!(
            "   ⚠️  {} receipt(s) look like repeats (same barcode, or same date, total, \
             location and items) and are counted each time",
            analysis.duplicate_receipts
        );
    }
    if analysis.skipped_receipts > 0 {
        println!();
        println!(
            "   ⚠️  {} receipt(s) skipped: missing or unreadable transaction date",
            analysis.skipped_receipts
        );
    }
}
