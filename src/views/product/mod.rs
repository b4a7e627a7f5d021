//! Product catalogue pages: lists, detail tabs, variants and attribute assignment.

pub mod action;
pub mod attribute;
pub mod detail;
pub mod list;
pub mod variant;

use crate::domain::model::{Record, RecordExt};

pub const PRODUCTS_TABLE: &str = "products-table";
pub const VARIANTS_TABLE: &str = "product-variants-table";
pub const ATTRIBUTES_TABLE: &str = "product-attributes-table";
pub const PRICING_TABLE: &str = "product-pricing-table";

/// Stored status of a product: the `active` flag wins, then a `status` string.
/// Empty when the record carries neither.
pub fn product_status(record: &Record) -> &str {
    match record.flag("active") {
        Some(true) => "active",
        Some(false) => "inactive",
        None => record.str_field("status"),
    }
}

pub fn status_variant(status: &str) -> &'static str {
    match status {
        "active" => "success",
        "inactive" => "warning",
        _ => "default",
    }
}

/// `PHP 1,234.50`. An empty currency reads as PHP.
pub fn format_price(currency: &str, price: f64) -> String {
    let currency = if currency.is_empty() { "PHP" } else { currency };
    let raw = format!("{:.2}", price.abs());
    let (int_part, dec_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{} {}{}.{}", currency, sign, grouped, dec_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("PHP", 1234.5), "PHP 1,234.50");
        assert_eq!(format_price("", 99.0), "PHP 99.00");
        assert_eq!(format_price("USD", 1234567.891), "USD 1,234,567.89");
        assert_eq!(format_price("PHP", 0.0), "PHP 0.00");
        assert_eq!(format_price("PHP", -1500.0), "PHP -1,500.00");
    }

    #[test]
    fn test_product_status_falls_back_to_status_field() {
        assert_eq!(product_status(&record! { "active" => true, "status" => "inactive" }), "active");
        assert_eq!(product_status(&record! { "active" => false }), "inactive");
        assert_eq!(product_status(&record! { "status" => "inactive" }), "inactive");
        assert_eq!(product_status(&record! { "name" => "Mug" }), "");
    }
}
