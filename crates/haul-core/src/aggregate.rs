//! Single-pass receipt aggregation
//!
//! Receipts are classified one at a time and folded into the gas or the
//! merchandise aggregate. The aggregator owns both accumulators for the
//! duration of one run; [`Aggregator::finish`] runs the post-processing
//! pass and hands back an immutable [`Analysis`].

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::analysis::{
    Analysis, DateRange, GasAggregate, ItemStat, MerchAggregate, RewardSummary,
};
use crate::classify::classify;
use crate::models::{month_key, FuelGrade, Receipt, ReceiptKind};

/// Stateful fold over receipts
#[derive(Debug, Default)]
pub struct Aggregator {
    merch: MerchAggregate,
    gas: GasAggregate,
    all_locations: BTreeSet<String>,
    min_year: Option<i32>,
    max_year: Option<i32>,
    seen: HashSet<String>,
    skipped: usize,
    duplicates: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one receipt into the running totals.
    ///
    /// Receipts without a usable transaction date are dropped without
    /// touching any aggregate.
    pub fn fold(&mut self, receipt: &Receipt) {
        let Some(date) = receipt.transaction_date else {
            debug!("Skipping receipt without a usable transaction date");
            self.skipped += 1;
            return;
        };

        if !self.seen.insert(receipt.fingerprint()) {
            warn!(
                "Duplicate receipt from {} at {} (counted again)",
                date, receipt.warehouse_name
            );
            self.duplicates += 1;
        }

        let year = date.year();
        self.min_year = Some(self.min_year.map_or(year, |y| y.min(year)));
        self.max_year = Some(self.max_year.map_or(year, |y| y.max(year)));

        let month = month_key(&date);
        self.all_locations.insert(receipt.warehouse_name.clone());

        match classify(receipt) {
            ReceiptKind::Gas => self.fold_gas(receipt, month),
            ReceiptKind::Merchandise => self.fold_merch(receipt, date, month),
        }
    }

    fn fold_gas(&mut self, receipt: &Receipt, month: String) {
        let gas = &mut self.gas;
        gas.receipts.push(receipt.clone());
        gas.locations.insert(receipt.warehouse_name.clone());
        gas.total_spent += receipt.total;
        gas.visits += 1;
        *gas.monthly.entry(month.clone()).or_insert(0.0) += receipt.total;

        for item in &receipt.items {
            let gallons = item.fuel_quantity;
            if gallons > 0.0 {
                gas.total_gallons += gallons;
                gas.price_sum += item.unit_price * gallons;
            }

            let Some(grade) = item.fuel_grade() else {
                continue;
            };
            let entry = gas.grades.entry(month.clone()).or_default();
            match grade {
                FuelGrade::Premium => {
                    entry.premium_spend += item.amount;
                    entry.premium_gallons += gallons;
                }
                FuelGrade::Regular => {
                    entry.regular_spend += item.amount;
                    entry.regular_gallons += gallons;
                }
            }
        }
    }

    fn fold_merch(&mut self, receipt: &Receipt, date: NaiveDateTime, month: String) {
        let merch = &mut self.merch;
        merch.receipts.push(receipt.clone());
        merch.locations.insert(receipt.warehouse_name.clone());
        merch.total_spent += receipt.total;
        merch.total_taxes += receipt.taxes;
        merch.instant_savings += receipt.instant_savings;
        *merch.monthly.entry(month).or_insert(0.0) += receipt.total;

        // Informational only: refunds never adjust the net total
        if receipt.is_refund() {
            merch.refund_count += 1;
            merch.refund_total += receipt.total.abs();
        }

        *merch.subtotal_by_year.entry(date.year()).or_insert(0.0) += receipt.sub_total;

        for item in &receipt.items {
            if !item.qualifies_for_item_stats() {
                continue;
            }
            let Some(item_number) = item.item_number.as_deref() else {
                continue;
            };

            merch
                .item_stats
                .entry(item_number.to_string())
                .or_insert_with(|| ItemStat::new(item_number, ""))
                .record(date, item.unit, item.amount, &item.description);
            merch.total_units += item.unit;
        }
    }

    /// Run the post-processing pass and produce the final analysis
    pub fn finish(self) -> Analysis {
        let Aggregator {
            mut merch,
            mut gas,
            all_locations,
            min_year,
            max_year,
            skipped,
            duplicates,
            ..
        } = self;

        for stat in merch.item_stats.values_mut() {
            stat.finalize();
        }
        gas.average_price_per_gallon = gas.weighted_average_price();

        let rewards = RewardSummary::from_subtotals(&merch.subtotal_by_year);
        let date_range = DateRange::from_years(min_year, max_year);

        info!(
            "Analysed {} merchandise and {} gas receipts ({})",
            merch.receipts.len(),
            gas.receipts.len(),
            date_range
        );
        if skipped > 0 {
            warn!("Skipped {} receipts without a usable transaction date", skipped);
        }

        Analysis {
            merch,
            gas,
            all_locations,
            date_range,
            rewards,
            skipped_receipts: skipped,
            duplicate_receipts: duplicates,
        }
    }
}

/// Classify, fold and post-process a list of receipts in one call
pub fn analyze(receipts: &[Receipt]) -> Analysis {
    let mut aggregator = Aggregator::new();
    for receipt in receipts {
        aggregator.fold(receipt);
    }
    aggregator.finish()
}
