//! Export of a finished analysis
//!
//! Supports:
//! - Full analysis as pretty-printed JSON (aggregates, rewards, date range)
//! - Per-item price statistics as CSV

use serde::Serialize;

use crate::analysis::Analysis;
use crate::error::{Error, Result};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {} (expected json or csv)", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One CSV row per catalog item
#[derive(Debug, Serialize)]
struct ItemRow<'a> {
    item_number: &'a str,
    name: &'a str,
    purchases: u32,
    total_units: f64,
    total_spent: f64,
    average_price: f64,
    first_price: f64,
    last_price: f64,
    min_price: f64,
    max_price: f64,
}

/// Export an analysis in the requested format
pub fn export(analysis: &Analysis, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(analysis),
        ExportFormat::Csv => export_items_csv(analysis),
    }
}

/// Pretty-printed JSON of the whole analysis (receipt lists excluded)
pub fn export_json(analysis: &Analysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// CSV of per-item statistics, ordered by item number
pub fn export_items_csv(analysis: &Analysis) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for stat in analysis.merch.item_stats.values() {
        writer.serialize(ItemRow {
            item_number: &stat.item_number,
            name: &stat.name,
            purchases: stat.purchases,
            total_units: stat.total_units,
            total_spent: round_cents(stat.total_spent),
            average_price: round_cents(stat.average_price()),
            first_price: round_cents(stat.first_price),
            last_price: round_cents(stat.last_price),
            min_price: round_cents(stat.min_price),
            max_price: round_cents(stat.max_price),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV output: {}", e)))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::analyze;
    use crate::test_utils::{item_line, ReceiptBuilder};

    fn sample() -> Analysis {
        analyze(&[
            ReceiptBuilder::new("2025-01-10")
                .total(16.97)
                .item(item_line("200", "PAPER TOWELS, 12 ROLL", 1.0, 16.97))
                .build(),
            ReceiptBuilder::new("2025-04-10")
                .total(19.99)
                .item(item_line("200", "PAPER TOWELS, 12 ROLL", 1.0, 19.99))
                .build(),
            ReceiptBuilder::new("2025-04-10")
                .total(9.0)
                .item(item_line("100", "BANANAS", 3.0, 9.0))
                .build(),
        ])
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_export_items_csv() {
        let csv = export_items_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "item_number,name,purchases,total_units,total_spent,average_price,first_price,last_price,min_price,max_price"
        );
        assert!(lines[1].starts_with("100,BANANAS,1,3.0,9.0,3.0,"));
        // Descriptions with commas are quoted
        assert!(lines[2].starts_with("200,\"PAPER TOWELS, 12 ROLL\",2,"));
        assert!(lines[2].ends_with(",16.97,19.99,16.97,19.99"));
    }

    #[test]
    fn test_export_items_csv_empty() {
        let csv = export_items_csv(&analyze(&[])).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_export_json() {
        let json = export_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["merch"]["item_stats"]["200"]["purchases"], 2);
        assert_eq!(value["date_range"], "2025");
        // Raw receipt lists stay out of the export
        assert!(value["merch"].get("receipts").is_none());
    }

    #[test]
    fn test_export_dispatch() {
        let analysis = sample();
        assert_eq!(
            export(&analysis, ExportFormat::Csv).unwrap(),
            export_items_csv(&analysis).unwrap()
        );
    }
}
