//! Price change and item lookup commands

use std::path::PathBuf;

use anyhow::Result;
use haul_core::format::{format_money, format_num};
use haul_core::PriceChange;

use super::{load_analysis, truncate, LoadOptions};

pub fn cmd_prices(files: &[PathBuf], options: &LoadOptions, limit: Option<usize>) -> Result<()> {
    let (analysis, config) = load_analysis(files, options)?;
    let limit = limit.unwrap_or(config.reports.price_changes);

    print_changes("📈 Price Increases", &analysis.price_increases(limit));
    print_changes("📉 Price Drops", &analysis.price_decreases(limit));

    Ok(())
}

fn print_changes(title: &str, changes: &[PriceChange]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    if changes.is_empty() {
        println!("   None.");
        return;
    }

    println!(
        "   {:10} │ {:30} │ {:>9} │ {:>9} │ {:>9}",
        "Item #", "Name", "First", "Latest", "Change"
    );
    println!("   ───────────┼────────────────────────────────┼───────────┼───────────┼──────────");
    for change in changes {
        let sign = if change.difference > 0.0 { "+" } else { "" };
        println!(
            "   {:10} │ {:30} │ {:>9} │ {:>9} │ {:>9}",
            truncate(&change.item_number, 10),
            truncate(&change.name, 30),
            format_money(change.first_price),
            format_money(change.last_price),
            format!("{}{}", sign, format_money(change.difference))
        );
    }
}

pub fn cmd_item(files: &[PathBuf], options: &LoadOptions, query: &str) -> Result<()> {
    let (analysis, _) = load_analysis(files, options)?;
    let matches = analysis.find_items(query);

    if matches.is_empty() {
        println!("No items match '{}'.", query);
        return Ok(());
    }

    for stat in matches {
        println!();
        println!("🔎 {} ({})", stat.name, stat.item_number);
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Purchases:    {}", stat.purchases);
        println!("   Units:        {}", format_num(stat.total_units, 0));
        println!("   Total spent:  {}", format_money(stat.total_spent));
        println!("   Avg price:    {}", format_money(stat.average_price()));
        println!(
            "   Range:        {} – {}",
            format_money(stat.min_price),
            format_money(stat.max_price)
        );
        println!(
            "   First/latest: {} → {}",
            format_money(stat.first_price),
            format_money(stat.last_price)
        );
        println!("   History:");
        for point in &stat.price_history {
            println!(
                "     {}  {}",
                point.date.format("%Y-%m-%d"),
                format_money(point.price)
            );
        }
    }

    Ok(())
}
