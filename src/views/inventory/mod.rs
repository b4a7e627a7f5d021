//! Inventory pages: per-location lists, item detail tabs, dashboard and movements.

pub mod action;
pub mod dashboard;
pub mod depreciation;
pub mod detail;
pub mod list;
pub mod movements;
pub mod serial;
pub mod transaction;

use crate::domain::model::{format_quantity, ItemType, Record, RecordExt, TransactionType};
use crate::view::labels::InventoryLabels;

pub const INVENTORY_TABLE: &str = "inventory-table";
pub const SERIAL_TABLE: &str = "serial-table";
pub const TRANSACTION_TABLE: &str = "transaction-table";
pub const MOVEMENTS_TABLE: &str = "movements-table";

/// `on_hand - reserved`, floored at zero.
pub fn available(item: &Record) -> f64 {
    (item.num("quantity_on_hand") - item.num("quantity_reserved")).max(0.0)
}

/// Whole numbers print without decimals, anything else with two.
pub fn format_available(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Low stock compares the unclamped available quantity against a positive reorder level.
pub fn is_low_stock(item: &Record) -> bool {
    let reorder = item.num("reorder_level");
    let available = item.num("quantity_on_hand") - item.num("quantity_reserved");
    reorder > 0.0 && available <= reorder
}

/// `name`, then `product_name`, then the id.
pub fn item_name(item: &Record) -> &str {
    match (item.str_field("name"), item.str_field("product_name")) {
        ("", "") => item.id(),
        ("", product_name) => product_name,
        (name, _) => name,
    }
}

pub fn item_type_label(item_type: ItemType, l: &InventoryLabels) -> &str {
    match item_type {
        ItemType::Serialized => &l.item_type.serialized,
        ItemType::NonSerialized => &l.item_type.non_serialized,
        ItemType::Consumable => &l.item_type.consumable,
    }
}

pub fn item_type_variant(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Serialized => "info",
        ItemType::NonSerialized => "default",
        ItemType::Consumable => "success",
    }
}

pub fn transaction_variant(kind: &str) -> &'static str {
    match kind {
        "received" => "success",
        "adjusted" => "info",
        "transferred" => "warning",
        "returned" | "write_off" => "danger",
        _ => "default",
    }
}

/// Quantity with a `+`/`-` prefix from the movement direction.
pub fn signed_quantity(transaction: &Record) -> String {
    let quantity = format_quantity(transaction.num("quantity"));
    match transaction
        .str_field("transaction_type")
        .parse::<TransactionType>()
        .map(|t| t.stock_sign())
    {
        Ok(1) => format!("+{}", quantity),
        Ok(-1) => format!("-{}", quantity),
        _ => quantity,
    }
}

pub fn serial_status_variant(status: &str) -> &'static str {
    match status {
        "available" => "success",
        "reserved" | "returned" => "warning",
        "defective" => "danger",
        _ => "default",
    }
}
