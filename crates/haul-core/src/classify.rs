//! Gas vs merchandise classification
//!
//! Receipt-level tags are authoritative when present. Receipts without
//! reliable type metadata are caught by the fuel-grade item numbers, the
//! only two catalog codes that represent actual fuel.

use crate::models::{Receipt, ReceiptKind};

/// Receipt type tag used by the pump receipts
pub const GAS_STATION_RECEIPT_TYPE: &str = "Gas Station";

/// Document type tag used by fuel receipts
pub const FUEL_DOCUMENT_TYPE: &str = "FuelReceipts";

/// Catalog item number for regular unleaded
pub const REGULAR_FUEL_ITEM: &str = "800599";

/// Catalog item number for premium unleaded
pub const PREMIUM_FUEL_ITEM: &str = "800877";

/// Every item number that marks a receipt as a fuel purchase
pub const FUEL_ITEM_NUMBERS: [&str; 2] = [REGULAR_FUEL_ITEM, PREMIUM_FUEL_ITEM];

/// Decide which aggregate a receipt belongs to. First matching rule wins.
pub fn classify(receipt: &Receipt) -> ReceiptKind {
    if receipt.receipt_type == GAS_STATION_RECEIPT_TYPE {
        return ReceiptKind::Gas;
    }

    if receipt.document_type == FUEL_DOCUMENT_TYPE {
        return ReceiptKind::Gas;
    }

    let has_fuel_line = receipt.items.iter().any(|item| {
        item.item_number
            .as_deref()
            .is_some_and(|n| FUEL_ITEM_NUMBERS.contains(&n))
    });
    if has_fuel_line {
        return ReceiptKind::Gas;
    }

    ReceiptKind::Merchandise
}
