//! Domain models for Haul
//!
//! Receipt exports are loosely typed: numbers arrive as numbers or strings,
//! identifiers as strings or integers, and any field may be missing. Every
//! field is coerced exactly once here, while deserializing, so the
//! aggregation code only ever sees a fully typed [`Receipt`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Location name used when a receipt carries no warehouse name
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Transaction type tag marking a return
pub const REFUND_TRANSACTION_TYPE: &str = "Refund";

const FIELD_SEPARATOR: [u8; 1] = [0x1f];

/// Which aggregate a receipt is folded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Gas,
    Merchandise,
}

impl ReceiptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Merchandise => "merchandise",
        }
    }
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fuel grades sold at the pump, identified by catalog item number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelGrade {
    Regular,
    Premium,
}

impl FuelGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Premium => "premium",
        }
    }

    /// Map a catalog item number to its fuel grade
    pub fn from_item_number(item_number: &str) -> Option<Self> {
        match item_number {
            crate::classify::REGULAR_FUEL_ITEM => Some(Self::Regular),
            crate::classify::PREMIUM_FUEL_ITEM => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for FuelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Regular => "Regular",
            Self::Premium => "Premium",
        };
        write!(f, "{}", label)
    }
}

/// One purchased SKU or fuel entry within a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLineItem")]
pub struct LineItem {
    #[serde(rename = "itemNumber")]
    pub item_number: Option<String>,
    #[serde(rename = "itemDescription01")]
    pub description: String,
    /// Unit quantity (negative on returned lines)
    pub unit: f64,
    /// Line amount
    pub amount: f64,
    /// Price per gallon, present on fuel lines only
    #[serde(rename = "itemUnitPriceAmount")]
    pub unit_price: f64,
    /// Gallons pumped, present on fuel lines only
    #[serde(rename = "fuelUnitQuantity")]
    pub fuel_quantity: f64,
}

impl LineItem {
    /// Whether this line feeds per-item price statistics
    pub fn qualifies_for_item_stats(&self) -> bool {
        self.unit > 0.0 && self.amount > 0.0 && self.item_number.is_some()
    }

    pub fn fuel_grade(&self) -> Option<FuelGrade> {
        self.item_number.as_deref().and_then(FuelGrade::from_item_number)
    }
}

/// One receipt as exported by the warehouse account page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawReceipt", rename_all = "camelCase")]
pub struct Receipt {
    /// Parsed transaction date; `None` when missing or unparsable
    pub transaction_date: Option<NaiveDateTime>,
    /// Receipt total (negative for returns)
    pub total: f64,
    /// Pre-tax subtotal, the basis for the reward estimate
    pub sub_total: f64,
    pub taxes: f64,
    pub instant_savings: f64,
    pub transaction_type: String,
    pub warehouse_name: String,
    pub receipt_type: String,
    pub document_type: String,
    pub transaction_barcode: Option<String>,
    #[serde(rename = "itemArray")]
    pub items: Vec<LineItem>,
}

impl Receipt {
    /// `YYYY-MM` bucket for this receipt, if it has a usable date
    pub fn month_key(&self) -> Option<String> {
        self.transaction_date.as_ref().map(month_key)
    }

    pub fn year(&self) -> Option<i32> {
        self.transaction_date.map(|d| d.year())
    }

    /// Returns and refunds: a negative total or an explicit refund tag
    pub fn is_refund(&self) -> bool {
        self.total < 0.0 || self.transaction_type == REFUND_TRANSACTION_TYPE
    }

    /// Stable identity used to spot the same receipt uploaded twice.
    ///
    /// The register barcode is unique per transaction when present;
    /// otherwise the date, total, location and item lines are hashed. The
    /// hashed form is a heuristic: two genuinely separate purchases with
    /// the same date, total, location and lines share a fingerprint.
    pub fn fingerprint(&self) -> String {
        if let Some(barcode) = &self.transaction_barcode {
            return format!("barcode:{}", barcode);
        }

        // Unit separator between fields so adjacent values cannot run together
        let mut hasher = Sha256::new();
        if let Some(date) = &self.transaction_date {
            hasher.update(date.to_string().as_bytes());
        }
        hasher.update(FIELD_SEPARATOR);
        hasher.update(self.total.to_be_bytes());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(self.warehouse_name.as_bytes());
        for item in &self.items {
            hasher.update(FIELD_SEPARATOR);
            hasher.update(item.item_number.as_deref().unwrap_or("").as_bytes());
            hasher.update(FIELD_SEPARATOR);
            hasher.update(item.amount.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Format the `YYYY-MM` month key for a date
pub fn month_key(date: &NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}

/// Parse a transaction date in any of the accepted ISO forms.
///
/// Offsets are dropped and the local wall-clock time is kept; a bare date
/// becomes midnight.
pub fn parse_transaction_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    // `%#z` takes `Z`, `+HH`, `+HHMM` and `+HH:MM`
    let offset_formats = [
        "%Y-%m-%dT%H:%M:%S%.f%#z", // 2025-09-01T10:15:00+0000
        "%Y-%m-%d %H:%M:%S%.f%#z", // 2025-09-01 10:15:00-07:00
        "%Y-%m-%dT%H:%M%#z",       // 2025-09-01T10:15-07:00
        "%Y-%m-%d %H:%M%#z",       // 2025-09-01 10:15Z
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // 2025-09-01T10:15:00.000
        "%Y-%m-%d %H:%M:%S%.f", // 2025-09-01 10:15:00
        "%Y-%m-%dT%H:%M",       // 2025-09-01T10:15
        "%Y-%m-%d %H:%M",       // 2025-09-01 10:15
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// =============================================================================
// Raw wire shapes
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    #[serde(default)]
    transaction_date: Value,
    #[serde(default)]
    total: Value,
    #[serde(default)]
    sub_total: Value,
    #[serde(default)]
    taxes: Value,
    #[serde(default)]
    instant_savings: Value,
    #[serde(default)]
    transaction_type: Value,
    #[serde(default)]
    warehouse_name: Value,
    #[serde(default)]
    receipt_type: Value,
    #[serde(default)]
    document_type: Value,
    #[serde(default)]
    transaction_barcode: Value,
    #[serde(default)]
    item_array: Value,
}

impl From<RawReceipt> for Receipt {
    fn from(raw: RawReceipt) -> Self {
        let items = match raw.item_array {
            Value::Array(values) => values
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value::<LineItem>(v).ok())
                .collect(),
            _ => Vec::new(),
        };

        let warehouse_name = coerce_text(&raw.warehouse_name);

        Receipt {
            transaction_date: raw.transaction_date.as_str().and_then(parse_transaction_date),
            total: coerce_number(&raw.total),
            sub_total: coerce_number(&raw.sub_total),
            taxes: coerce_number(&raw.taxes),
            instant_savings: coerce_number(&raw.instant_savings),
            transaction_type: coerce_text(&raw.transaction_type),
            warehouse_name: if warehouse_name.is_empty() {
                UNKNOWN_LOCATION.to_string()
            } else {
                warehouse_name
            },
            receipt_type: coerce_text(&raw.receipt_type),
            document_type: coerce_text(&raw.document_type),
            transaction_barcode: coerce_identifier(&raw.transaction_barcode),
            items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLineItem {
    #[serde(default)]
    item_number: Value,
    #[serde(default)]
    item_description01: Value,
    #[serde(default)]
    unit: Value,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    item_unit_price_amount: Value,
    #[serde(default)]
    fuel_unit_quantity: Value,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        LineItem {
            item_number: coerce_identifier(&raw.item_number),
            description: coerce_text(&raw.item_description01),
            unit: coerce_number(&raw.unit),
            amount: coerce_number(&raw.amount),
            unit_price: coerce_number(&raw.item_unit_price_amount),
            fuel_quantity: coerce_number(&raw.fuel_unit_quantity),
        }
    }
}

/// Numbers or numeric strings; everything else is zero
fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(['$', ',', ' '], "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Strings (trimmed) or numbers rendered as text; empty means absent
fn coerce_identifier(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn receipt_from(value: Value) -> Receipt {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_transaction_date_forms() {
        let midnight = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_transaction_date("2025-09-01"), Some(midnight));
        assert_eq!(parse_transaction_date("2025-09-01T00:00:00"), Some(midnight));
        assert_eq!(parse_transaction_date(" 2025-09-01 "), Some(midnight));

        let with_time = parse_transaction_date("2025-09-01 14:32:10").unwrap();
        assert_eq!(with_time.hour(), 14);

        let with_offset = parse_transaction_date("2025-09-01T08:15:00-07:00").unwrap();
        assert_eq!(with_offset.hour(), 8);

        let fractional = parse_transaction_date("2025-09-01T08:15:00.250").unwrap();
        assert_eq!(fractional.minute(), 15);

        // ISO offsets without seconds or without the colon
        let no_seconds = parse_transaction_date("2025-09-01T08:15-07:00").unwrap();
        assert_eq!((no_seconds.hour(), no_seconds.minute()), (8, 15));

        let compact_offset = parse_transaction_date("2025-09-01T08:15:00+0000").unwrap();
        assert_eq!(compact_offset.hour(), 8);

        let zulu_minutes = parse_transaction_date("2025-09-01T08:15Z").unwrap();
        assert_eq!(zulu_minutes.minute(), 15);

        let spaced = parse_transaction_date("2025-09-01 23:30:00-07:00").unwrap();
        assert_eq!(spaced.date(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(spaced.hour(), 23);
    }

    #[test]
    fn test_parse_transaction_date_rejects_garbage() {
        assert_eq!(parse_transaction_date(""), None);
        assert_eq!(parse_transaction_date("09/01/2025"), None);
        assert_eq!(parse_transaction_date("2025-13-01"), None);
        assert_eq!(parse_transaction_date("yesterday"), None);
    }

    #[test]
    fn test_month_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(month_key(&date), "2024-03");
    }

    #[test]
    fn test_receipt_field_coercion() {
        let receipt = receipt_from(json!({
            "transactionDate": "2025-09-05",
            "total": "1,204.50",
            "subTotal": 1150,
            "taxes": null,
            "transactionType": "Sales",
            "warehouseName": "  Issaquah  ",
            "itemArray": [
                {"itemNumber": 12345, "itemDescription01": " KS WATER ", "unit": "2", "amount": "$9.98"},
                "not an item",
                {"itemNumber": "", "unit": 1, "amount": 3.0}
            ]
        }));

        assert_eq!(receipt.total, 1204.50);
        assert_eq!(receipt.sub_total, 1150.0);
        assert_eq!(receipt.taxes, 0.0);
        assert_eq!(receipt.warehouse_name, "Issaquah");
        assert_eq!(receipt.items.len(), 2);

        let first = &receipt.items[0];
        assert_eq!(first.item_number.as_deref(), Some("12345"));
        assert_eq!(first.description, "KS WATER");
        assert_eq!(first.unit, 2.0);
        assert_eq!(first.amount, 9.98);
        assert!(first.qualifies_for_item_stats());

        // Empty item numbers never qualify
        assert_eq!(receipt.items[1].item_number, None);
        assert!(!receipt.items[1].qualifies_for_item_stats());
    }

    #[test]
    fn test_non_numeric_values_default_to_zero() {
        let receipt = receipt_from(json!({
            "transactionDate": "2025-09-05",
            "total": "abc",
            "subTotal": "NaN",
            "instantSavings": true
        }));
        assert_eq!(receipt.total, 0.0);
        assert_eq!(receipt.sub_total, 0.0);
        assert_eq!(receipt.instant_savings, 0.0);
        assert!(receipt.items.is_empty());
    }

    #[test]
    fn test_missing_location_defaults_to_unknown() {
        let missing = receipt_from(json!({"transactionDate": "2025-09-05"}));
        assert_eq!(missing.warehouse_name, UNKNOWN_LOCATION);

        let blank = receipt_from(json!({"warehouseName": "   "}));
        assert_eq!(blank.warehouse_name, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_date_comes_from_transaction_date_only() {
        let receipt = receipt_from(json!({"transactionDate": "2024-12-24T17:01:00"}));
        assert_eq!(receipt.month_key().as_deref(), Some("2024-12"));
        assert_eq!(receipt.year(), Some(2024));

        let date_time_only = receipt_from(json!({"transactionDateTime": "2024-12-24T17:01:00"}));
        assert_eq!(date_time_only.transaction_date, None);

        let bad = receipt_from(json!({"transactionDate": "soon"}));
        assert_eq!(bad.transaction_date, None);
        assert_eq!(bad.month_key(), None);
    }

    #[test]
    fn test_is_refund() {
        let negative = receipt_from(json!({"total": -12.99}));
        assert!(negative.is_refund());

        let tagged = receipt_from(json!({"total": 0, "transactionType": "Refund"}));
        assert!(tagged.is_refund());

        let sale = receipt_from(json!({"total": 50.0, "transactionType": "Sales"}));
        assert!(!sale.is_refund());
    }

    #[test]
    fn test_fingerprint_prefers_barcode() {
        let a = receipt_from(json!({"transactionBarcode": "21134300501862509051323", "total": 5}));
        let b = receipt_from(json!({"transactionBarcode": "21134300501862509051323", "total": 9}));
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = receipt_from(json!({"transactionDate": "2025-01-01", "total": 5}));
        let d = receipt_from(json!({"transactionDate": "2025-01-01", "total": 5}));
        let e = receipt_from(json!({"transactionDate": "2025-01-02", "total": 5}));
        assert_eq!(c.fingerprint(), d.fingerprint());
        assert_ne!(c.fingerprint(), e.fingerprint());
        assert_eq!(c.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_fields_do_not_run_together() {
        let a = receipt_from(json!({
            "transactionDate": "2025-01-01",
            "warehouseName": "Issaquah1",
            "itemArray": [{"itemNumber": "2", "amount": 5}]
        }));
        let b = receipt_from(json!({
            "transactionDate": "2025-01-01",
            "warehouseName": "Issaquah",
            "itemArray": [{"itemNumber": "12", "amount": 5}]
        }));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fuel_grade_from_item_number() {
        assert_eq!(FuelGrade::from_item_number("800599"), Some(FuelGrade::Regular));
        assert_eq!(FuelGrade::from_item_number("800877"), Some(FuelGrade::Premium));
        assert_eq!(FuelGrade::from_item_number("800600"), None);
        assert_eq!(FuelGrade::Premium.to_string(), "Premium");
    }

    #[test]
    fn test_receipt_serialization_round_trips_through_raw_shape() {
        let receipt = receipt_from(json!({
            "transactionDate": "2025-02-10T09:30:00",
            "total": 20.0,
            "warehouseName": "Kirkland",
            "itemArray": [{"itemNumber": "42", "itemDescription01": "EGGS", "unit": 1, "amount": 20.0}]
        }));
        let encoded = serde_json::to_value(&receipt).unwrap();
        assert_eq!(encoded["warehouseName"], "Kirkland");
        assert_eq!(encoded["itemArray"][0]["itemNumber"], "42");

        let decoded: Receipt = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, receipt);
    }
}
