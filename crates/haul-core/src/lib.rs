//! Haul Core Library
//!
//! Warehouse receipt analysis for the Haul tool:
//! - Typed ingestion of receipt JSON exports with lenient field coercion
//! - Gas vs merchandise classification
//! - Single-pass aggregation into spend, fuel and per-item price statistics
//! - Post-processing (price summaries, weighted fuel price, reward estimates)
//! - Ranked report views, export and layered configuration

pub mod aggregate;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod ingest;
pub mod models;
pub mod reports;

/// Test utilities including receipt builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{analyze, Aggregator};
pub use analysis::{
    Analysis, DateRange, GasAggregate, GasGradeEntry, ItemStat, MerchAggregate, PricePoint,
    RewardSummary, RewardYear, REWARD_RATE,
};
pub use classify::{classify, FUEL_ITEM_NUMBERS, PREMIUM_FUEL_ITEM, REGULAR_FUEL_ITEM};
pub use config::{Config, ReportLimits};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use ingest::{load_files, parse_receipts, BatchPolicy, FileFailure, LoadedFile, ReceiptBatch};
pub use models::{FuelGrade, LineItem, Receipt, ReceiptKind};
pub use reports::{GradePrice, GradeSpend, ItemRanking, MonthlyPoint, PriceChange};
