//! Display formatting shared by the report views

use chrono::NaiveDate;

/// `$1,234.56`, with the sign in front of the dollar sign
pub fn format_money(value: f64) -> String {
    let formatted = format_num(value.abs(), 2);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

/// Fixed decimals with thousands separators
pub fn format_num(value: f64, digits: usize) -> String {
    let raw = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// `2025-09` → `Sep '25`; unparsable keys are returned unchanged
pub fn month_label(month_key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month_key), "%Y-%m-%d")
        .map(|d| d.format("%b '%y").to_string())
        .unwrap_or_else(|_| month_key.to_string())
}
