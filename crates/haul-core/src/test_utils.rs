//! Test utilities for haul-core
//!
//! Builders for typed receipts so tests can describe a scenario without
//! spelling out the JSON wire shape.

use crate::models::{parse_transaction_date, LineItem, Receipt, UNKNOWN_LOCATION};

/// Builder for [`Receipt`] values
pub struct ReceiptBuilder {
    receipt: Receipt,
}

impl ReceiptBuilder {
    /// Start a receipt dated `date` (any accepted transaction date form).
    /// An unparsable string yields a receipt with no date.
    pub fn new(date: &str) -> Self {
        Self {
            receipt: Receipt {
                transaction_date: parse_transaction_date(date),
                total: 0.0,
                sub_total: 0.0,
                taxes: 0.0,
                instant_savings: 0.0,
                transaction_type: "Sales".to_string(),
                warehouse_name: UNKNOWN_LOCATION.to_string(),
                receipt_type: "In-Warehouse".to_string(),
                document_type: "WarehouseReceiptDetail".to_string(),
                transaction_barcode: None,
                items: Vec::new(),
            },
        }
    }

    /// A receipt with no transaction date at all
    pub fn undated() -> Self {
        Self::new("")
    }

    pub fn total(mut self, total: f64) -> Self {
        self.receipt.total = total;
        self
    }

    pub fn sub_total(mut self, sub_total: f64) -> Self {
        self.receipt.sub_total = sub_total;
        self
    }

    pub fn taxes(mut self, taxes: f64) -> Self {
        self.receipt.taxes = taxes;
        self
    }

    pub fn instant_savings(mut self, savings: f64) -> Self {
        self.receipt.instant_savings = savings;
        self
    }

    pub fn transaction_type(mut self, transaction_type: &str) -> Self {
        self.receipt.transaction_type = transaction_type.to_string();
        self
    }

    pub fn location(mut self, name: &str) -> Self {
        self.receipt.warehouse_name = name.to_string();
        self
    }

    pub fn receipt_type(mut self, receipt_type: &str) -> Self {
        self.receipt.receipt_type = receipt_type.to_string();
        self
    }

    pub fn document_type(mut self, document_type: &str) -> Self {
        self.receipt.document_type = document_type.to_string();
        self
    }

    pub fn barcode(mut self, barcode: &str) -> Self {
        self.receipt.transaction_barcode = Some(barcode.to_string());
        self
    }

    pub fn item(mut self, item: LineItem) -> Self {
        self.receipt.items.push(item);
        self
    }

    pub fn build(self) -> Receipt {
        self.receipt
    }
}

/// A merchandise line
pub fn item_line(item_number: &str, description: &str, unit: f64, amount: f64) -> LineItem {
    LineItem {
        item_number: Some(item_number.to_string()),
        description: description.to_string(),
        unit,
        amount,
        unit_price: 0.0,
        fuel_quantity: 0.0,
    }
}

/// A fuel line; the amount is gallons × price
pub fn fuel_line(item_number: &str, gallons: f64, price_per_gallon: f64) -> LineItem {
    LineItem {
        item_number: Some(item_number.to_string()),
        description: "GAS".to_string(),
        unit: 1.0,
        amount: gallons * price_per_gallon,
        unit_price: price_per_gallon,
        fuel_quantity: gallons,
    }
}
