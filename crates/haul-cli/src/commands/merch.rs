//! Merchandise breakdown command

use std::path::PathBuf;

use anyhow::Result;
use haul_core::format::{format_money, format_num};
use haul_core::{Analysis, ItemRanking, MonthlyPoint};

use super::{load_analysis, print_summary, truncate, LoadOptions};

pub fn cmd_merch(files: &[PathBuf], options: &LoadOptions, limit: Option<usize>) -> Result<()> {
    let (analysis, config) = load_analysis(files, options)?;
    let limit = limit.unwrap_or(config.reports.top_items);

    print_summary(&analysis);
    if analysis.merch.visits() == 0 {
        return Ok(());
    }

    print_item_table(
        "💎 Most Expensive Items",
        &analysis.most_expensive(limit),
        ItemColumn::MaxPrice,
    );
    print_item_table(
        "💰 Top Spend",
        &analysis.top_by_spend(limit),
        ItemColumn::TotalSpent,
    );
    print_item_table(
        "📦 Most Purchased",
        &analysis.most_purchased(limit),
        ItemColumn::Units,
    );
    print_rewards(&analysis);
    print_monthly("📈 Monthly Merchandise Spend", &analysis.merch_monthly());

    Ok(())
}

/// Which figure a ranked table leads with
#[derive(Debug, Clone, Copy)]
enum ItemColumn {
    MaxPrice,
    TotalSpent,
    Units,
}

fn print_item_table(title: &str, rows: &[ItemRanking], column: ItemColumn) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No items.");
        return;
    }

    let header = match column {
        ItemColumn::MaxPrice => "Max Price",
        ItemColumn::TotalSpent => "Spent",
        ItemColumn::Units => "Units",
    };
    println!(
        "   {:10} │ {:30} │ {:>12} │ {:>10}",
        "Item #", "Name", header, "Avg Price"
    );
    println!("   ───────────┼────────────────────────────────┼──────────────┼───────────");

    for row in rows {
        let lead = match column {
            ItemColumn::MaxPrice => format_money(row.max_price),
            ItemColumn::TotalSpent => format_money(row.total_spent),
            ItemColumn::Units => format!(
                "{} (Δ {})",
                format_num(row.total_units, 0),
                format_money(row.price_spread)
            ),
        };
        println!(
            "   {:10} │ {:30} │ {:>12} │ {:>10}",
            truncate(&row.item_number, 10),
            truncate(&row.name, 30),
            lead,
            format_money(row.average_price)
        );
    }
}

fn print_rewards(analysis: &Analysis) {
    println!();
    println!("🎁 Estimated Rewards");
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.rewards.years.is_empty() {
        println!("   No qualifying spend.");
        return;
    }

    println!("   {:6} │ {:>14} │ {:>10}", "Year", "Qualifying", "Reward");
    println!("   ───────┼────────────────┼───────────");
    for year in &analysis.rewards.years {
        println!(
            "   {:6} │ {:>14} │ {:>10}",
            year.year,
            format_money(year.qualifying_spend),
            format_money(year.reward)
        );
    }
    println!("   Total: {}", format_money(analysis.rewards.total));
}

/// Monthly series as a text bar chart
pub fn print_monthly(title: &str, points: &[MonthlyPoint]) {
    println!();
    println!("{}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    if points.is_empty() {
        println!("   No data.");
        return;
    }

    let max = points.iter().map(|p| p.amount).fold(0.0_f64, f64::max);
    for point in points {
        let width = if max > 0.0 && point.amount > 0.0 {
            ((point.amount / max) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {:8} {:>12}  {}",
            point.label,
            format_money(point.amount),
            "█".repeat(width)
        );
    }
}
