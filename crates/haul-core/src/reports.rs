//! Ranked tables and time series built from a finished [`Analysis`]

use serde::Serialize;

use crate::analysis::{Analysis, ItemStat};
use crate::format::month_label;
use crate::models::FuelGrade;

/// One row of a ranked item table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRanking {
    pub item_number: String,
    pub name: String,
    pub purchases: u32,
    pub total_units: f64,
    pub total_spent: f64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Max minus min observed unit price
    pub price_spread: f64,
}

impl From<&ItemStat> for ItemRanking {
    fn from(stat: &ItemStat) -> Self {
        Self {
            item_number: stat.item_number.clone(),
            name: stat.name.clone(),
            purchases: stat.purchases,
            total_units: stat.total_units,
            total_spent: stat.total_spent,
            average_price: stat.average_price(),
            min_price: stat.min_price,
            max_price: stat.max_price,
            price_spread: stat.price_spread(),
        }
    }
}

/// An item whose latest price differs from its first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub item_number: String,
    pub name: String,
    pub first_price: f64,
    pub last_price: f64,
    /// Last minus first price
    pub difference: f64,
}

impl From<&ItemStat> for PriceChange {
    fn from(stat: &ItemStat) -> Self {
        Self {
            item_number: stat.item_number.clone(),
            name: stat.name.clone(),
            first_price: stat.first_price,
            last_price: stat.last_price,
            difference: stat.price_change(),
        }
    }
}

/// Spend for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month_key: String,
    pub label: String,
    pub amount: f64,
}

/// Average price per gallon of one grade in one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradePrice {
    pub month_key: String,
    pub label: String,
    pub grade: FuelGrade,
    pub price: f64,
}

/// Spend on one grade in one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSpend {
    pub month_key: String,
    pub label: String,
    pub grade: FuelGrade,
    pub amount: f64,
}

impl Analysis {
    /// Items by highest unit price ever paid
    pub fn most_expensive(&self, limit: usize) -> Vec<ItemRanking> {
        let mut items: Vec<&ItemStat> = self
            .merch
            .item_stats
            .values()
            .filter(|s| s.max_price > 0.0)
            .collect();
        items.sort_by(|a, b| b.max_price.total_cmp(&a.max_price));
        items.into_iter().take(limit).map(ItemRanking::from).collect()
    }

    /// Items by total amount spent
    pub fn top_by_spend(&self, limit: usize) -> Vec<ItemRanking> {
        let mut items = self.bought_items();
        items.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
        items.into_iter().take(limit).map(ItemRanking::from).collect()
    }

    /// Items by units bought
    pub fn most_purchased(&self, limit: usize) -> Vec<ItemRanking> {
        let mut items = self.bought_items();
        items.sort_by(|a, b| b.total_units.total_cmp(&a.total_units));
        items.into_iter().take(limit).map(ItemRanking::from).collect()
    }

    /// Items whose latest price is above the first, largest increase first
    pub fn price_increases(&self, limit: usize) -> Vec<PriceChange> {
        let mut items: Vec<&ItemStat> = self
            .merch
            .item_stats
            .values()
            .filter(|s| s.last_price > s.first_price)
            .collect();
        items.sort_by(|a, b| b.price_change().total_cmp(&a.price_change()));
        items.into_iter().take(limit).map(PriceChange::from).collect()
    }

    /// Items whose latest price is below the first, largest drop first
    pub fn price_decreases(&self, limit: usize) -> Vec<PriceChange> {
        let mut items: Vec<&ItemStat> = self
            .merch
            .item_stats
            .values()
            .filter(|s| s.last_price < s.first_price)
            .collect();
        items.sort_by(|a, b| a.price_change().total_cmp(&b.price_change()));
        items.into_iter().take(limit).map(PriceChange::from).collect()
    }

    /// Merchandise spend per month, oldest first
    pub fn merch_monthly(&self) -> Vec<MonthlyPoint> {
        monthly_points(self.merch.monthly.iter())
    }

    /// Gas spend per month, oldest first
    pub fn gas_monthly(&self) -> Vec<MonthlyPoint> {
        monthly_points(self.gas.monthly.iter())
    }

    /// Per-month price per gallon by grade, premium before regular.
    /// A grade with no gallons in a month is left out.
    pub fn gas_grade_prices(&self) -> Vec<GradePrice> {
        let mut points = Vec::new();
        for (month_key, entry) in &self.gas.grades {
            let grades = [
                (FuelGrade::Premium, entry.premium_price()),
                (FuelGrade::Regular, entry.regular_price()),
            ];
            for (grade, price) in grades {
                if let Some(price) = price {
                    points.push(GradePrice {
                        month_key: month_key.clone(),
                        label: month_label(month_key),
                        grade,
                        price,
                    });
                }
            }
        }
        points
    }

    /// Per-month spend by grade, premium before regular.
    /// A grade with neither spend nor gallons in a month is left out.
    pub fn gas_grade_spend(&self) -> Vec<GradeSpend> {
        let mut points = Vec::new();
        for (month_key, entry) in &self.gas.grades {
            let grades = [
                (FuelGrade::Premium, entry.premium_spend, entry.premium_gallons),
                (FuelGrade::Regular, entry.regular_spend, entry.regular_gallons),
            ];
            for (grade, amount, gallons) in grades {
                if amount == 0.0 && gallons == 0.0 {
                    continue;
                }
                points.push(GradeSpend {
                    month_key: month_key.clone(),
                    label: month_label(month_key),
                    grade,
                    amount,
                });
            }
        }
        points
    }

    /// Look up items by exact item number or by name substring
    pub fn find_items(&self, query: &str) -> Vec<&ItemStat> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(stat) = self.merch.item_stats.get(query) {
            return vec![stat];
        }

        let needle = query.to_lowercase();
        self.merch
            .item_stats
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn bought_items(&self) -> Vec<&ItemStat> {
        self.merch
            .item_stats
            .values()
            .filter(|s| s.total_units > 0.0 && s.total_spent > 0.0)
            .collect()
    }
}

fn monthly_points<'a>(months: impl Iterator<Item = (&'a String, &'a f64)>) -> Vec<MonthlyPoint> {
    months
        .map(|(month_key, amount)| MonthlyPoint {
            month_key: month_key.clone(),
            label: month_label(month_key),
            amount: *amount,
        })
        .collect()
}
