//! Fuel breakdown command

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use haul_core::format::format_money;
use haul_core::FuelGrade;

use super::{load_analysis, print_monthly, LoadOptions};

pub fn cmd_gas(files: &[PathBuf], options: &LoadOptions) -> Result<()> {
    let (analysis, _) = load_analysis(files, options)?;
    let gas = &analysis.gas;

    println!();
    println!("⛽ Gas Summary ({})", analysis.date_range);
    println!("   ─────────────────────────────────────────────────────────────");

    if gas.visits == 0 {
        println!("   No gas receipts found.");
        return Ok(());
    }

    println!("   Spend:          {}", format_money(gas.total_spent));
    println!("   Visits:         {}", gas.visits);
    println!("   Gallons:        {:.2}", gas.total_gallons);
    println!(
        "   Avg price/gal:  {}",
        format_money(gas.average_price_per_gallon)
    );
    println!("   Stations:       {}", gas.locations.len());

    // One row per month, premium and regular side by side
    let mut by_month: BTreeMap<String, GradeRow> = BTreeMap::new();
    for point in analysis.gas_grade_prices() {
        let row = by_month
            .entry(point.month_key.clone())
            .or_insert_with(|| GradeRow::new(&point.label));
        match point.grade {
            FuelGrade::Premium => row.premium_price = Some(point.price),
            FuelGrade::Regular => row.regular_price = Some(point.price),
        }
    }
    for point in analysis.gas_grade_spend() {
        let row = by_month
            .entry(point.month_key.clone())
            .or_insert_with(|| GradeRow::new(&point.label));
        match point.grade {
            FuelGrade::Premium => row.premium_spend = Some(point.amount),
            FuelGrade::Regular => row.regular_spend = Some(point.amount),
        }
    }

    println!();
    println!("💲 Fuel by Grade");
    println!("   ─────────────────────────────────────────────────────────────────────────────");
    if by_month.is_empty() {
        println!("   No graded fuel lines.");
    } else {
        println!(
            "   {:8} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>10}",
            "Month", "Prem $/gal", "Reg $/gal", "Prem spend", "Reg spend", "Total"
        );
        println!("   ─────────┼────────────┼────────────┼────────────┼────────────┼───────────");
        for (month_key, row) in &by_month {
            let total = gas.monthly.get(month_key).copied().unwrap_or(0.0);
            println!(
                "   {:8} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>10}",
                row.label,
                money_or_dash(row.premium_price),
                money_or_dash(row.regular_price),
                money_or_dash(row.premium_spend),
                money_or_dash(row.regular_spend),
                format_money(total)
            );
        }
    }

    print_monthly("📈 Monthly Gas Spend", &analysis.gas_monthly());
    Ok(())
}

struct GradeRow {
    label: String,
    premium_price: Option<f64>,
    regular_price: Option<f64>,
    premium_spend: Option<f64>,
    regular_spend: Option<f64>,
}

impl GradeRow {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            premium_price: None,
            regular_price: None,
            premium_spend: None,
            regular_spend: None,
        }
    }
}

fn money_or_dash(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_else(|| "-".to_string())
}
