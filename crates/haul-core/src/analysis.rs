//! Aggregate structures and the post-processing pass
//!
//! The fold in [`crate::aggregate`] only does running updates. Anything
//! that needs the complete picture (sorted price histories, the weighted
//! fuel price, the date range, reward estimates) is derived here once the
//! fold has finished.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Receipt;

/// Flat reward rate applied to the qualifying (pre-tax) subtotal
pub const REWARD_RATE: f64 = 0.02;

/// One observed unit price for an item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDateTime,
    pub price: f64,
}

/// Running and derived statistics for one catalog item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStat {
    pub item_number: String,
    /// First non-empty description seen
    pub name: String,
    pub total_spent: f64,
    pub total_units: f64,
    pub purchases: u32,
    /// Unit price observations, sorted by date after [`ItemStat::finalize`]
    pub price_history: Vec<PricePoint>,
    pub first_price: f64,
    pub last_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl ItemStat {
    pub fn new(item_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_number: item_number.into(),
            name: name.into(),
            total_spent: 0.0,
            total_units: 0.0,
            purchases: 0,
            price_history: Vec::new(),
            first_price: 0.0,
            last_price: 0.0,
            min_price: 0.0,
            max_price: 0.0,
        }
    }

    /// Record one purchase of this item
    pub fn record(&mut self, date: NaiveDateTime, units: f64, amount: f64, description: &str) {
        if self.name.is_empty() && !description.is_empty() {
            self.name = description.to_string();
        }
        self.total_spent += amount;
        self.total_units += units;
        self.purchases += 1;
        self.price_history.push(PricePoint {
            date,
            price: amount / units,
        });
    }

    /// Sort the price history and derive first/last/min/max.
    ///
    /// All four are zero when there are no observations.
    pub fn finalize(&mut self) {
        // Stable: same-day purchases keep their fold order
        self.price_history.sort_by_key(|p| p.date);

        let (Some(first), Some(last)) = (self.price_history.first(), self.price_history.last())
        else {
            self.first_price = 0.0;
            self.last_price = 0.0;
            self.min_price = 0.0;
            self.max_price = 0.0;
            return;
        };

        self.first_price = first.price;
        self.last_price = last.price;
        self.min_price = self
            .price_history
            .iter()
            .map(|p| p.price)
            .fold(f64::INFINITY, f64::min);
        self.max_price = self
            .price_history
            .iter()
            .map(|p| p.price)
            .fold(f64::NEG_INFINITY, f64::max);
    }

    /// Average price paid per unit (0 when no units were bought)
    pub fn average_price(&self) -> f64 {
        if self.total_units > 0.0 {
            self.total_spent / self.total_units
        } else {
            0.0
        }
    }

    /// Price movement between the first and the latest purchase
    pub fn price_change(&self) -> f64 {
        self.last_price - self.first_price
    }

    /// Spread between the cheapest and the most expensive purchase
    pub fn price_spread(&self) -> f64 {
        self.max_price - self.min_price
    }
}

/// Merchandise (in-warehouse) statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MerchAggregate {
    /// Purchases minus refunds, from receipt totals
    pub total_spent: f64,
    /// Units across all qualifying line items
    pub total_units: f64,
    pub refund_count: u32,
    /// Sum of absolute refund totals (informational)
    pub refund_total: f64,
    pub total_taxes: f64,
    pub instant_savings: f64,
    /// Pre-tax subtotal per calendar year
    pub subtotal_by_year: BTreeMap<i32, f64>,
    /// Spend per `YYYY-MM`
    pub monthly: BTreeMap<String, f64>,
    pub locations: BTreeSet<String>,
    pub item_stats: BTreeMap<String, ItemStat>,
    #[serde(skip)]
    pub receipts: Vec<Receipt>,
}

impl MerchAggregate {
    pub fn visits(&self) -> usize {
        self.receipts.len()
    }

    /// Net spend per merchandise receipt (0 with no receipts)
    pub fn average_per_visit(&self) -> f64 {
        if self.receipts.is_empty() {
            0.0
        } else {
            self.total_spent / self.receipts.len() as f64
        }
    }
}

/// Fuel grade breakdown for one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GasGradeEntry {
    pub premium_spend: f64,
    pub premium_gallons: f64,
    pub regular_spend: f64,
    pub regular_gallons: f64,
}

impl GasGradeEntry {
    pub fn premium_price(&self) -> Option<f64> {
        (self.premium_gallons > 0.0).then(|| self.premium_spend / self.premium_gallons)
    }

    pub fn regular_price(&self) -> Option<f64> {
        (self.regular_gallons > 0.0).then(|| self.regular_spend / self.regular_gallons)
    }
}

/// Fuel statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GasAggregate {
    pub total_spent: f64,
    pub total_gallons: f64,
    /// Σ price × gallons, the numerator of the weighted average
    pub price_sum: f64,
    pub visits: u32,
    /// Gallon-weighted average price, set by the post-processor
    pub average_price_per_gallon: f64,
    pub monthly: BTreeMap<String, f64>,
    pub grades: BTreeMap<String, GasGradeEntry>,
    pub locations: BTreeSet<String>,
    #[serde(skip)]
    pub receipts: Vec<Receipt>,
}

impl GasAggregate {
    /// Σ(price × gallons) / Σ(gallons), 0 when nothing was pumped
    pub fn weighted_average_price(&self) -> f64 {
        if self.total_gallons > 0.0 {
            self.price_sum / self.total_gallons
        } else {
            0.0
        }
    }
}

/// Years covered by the analysed receipts.
///
/// Serialized as its display string (`"No data"`, `"2025"`, `"2023 – 2025"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum DateRange {
    NoData,
    Year { year: i32 },
    Span { from: i32, to: i32 },
}

impl DateRange {
    /// Build from the earliest and latest observed years
    pub fn from_years(min: Option<i32>, max: Option<i32>) -> Self {
        match (min, max) {
            (Some(from), Some(to)) if from == to => Self::Year { year: from },
            (Some(from), Some(to)) => Self::Span { from, to },
            _ => Self::NoData,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "No data"),
            Self::Year { year } => write!(f, "{}", year),
            Self::Span { from, to } => write!(f, "{} – {}", from, to),
        }
    }
}

impl From<DateRange> for String {
    fn from(range: DateRange) -> Self {
        range.to_string()
    }
}

/// Estimated reward for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardYear {
    pub year: i32,
    pub qualifying_spend: f64,
    pub reward: f64,
}

/// Reward estimate table, newest year first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardSummary {
    pub years: Vec<RewardYear>,
    pub total: f64,
}

impl RewardSummary {
    pub fn from_subtotals(subtotal_by_year: &BTreeMap<i32, f64>) -> Self {
        let years: Vec<RewardYear> = subtotal_by_year
            .iter()
            .rev()
            .map(|(&year, &qualifying_spend)| RewardYear {
                year,
                qualifying_spend,
                reward: qualifying_spend * REWARD_RATE,
            })
            .collect();
        let total = years.iter().map(|y| y.reward).sum();
        Self { years, total }
    }
}

/// Result of one processing run, handed read-only to the views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub merch: MerchAggregate,
    pub gas: GasAggregate,
    /// Every location seen, gas and merchandise combined
    pub all_locations: BTreeSet<String>,
    pub date_range: DateRange,
    pub rewards: RewardSummary,
    /// Receipts dropped for a missing or unparsable date
    pub skipped_receipts: usize,
    /// Receipts seen more than once (still counted in every total)
    pub duplicate_receipts: usize,
}

impl Analysis {
    /// Total receipts that made it into either aggregate
    pub fn receipt_count(&self) -> usize {
        self.merch.receipts.len() + self.gas.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipt_count() == 0
    }
}
