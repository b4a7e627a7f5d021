//! Sales (revenue) pages and actions.

pub mod action;
pub mod detail;
pub mod line_items;
pub mod list;
pub mod payment;
pub mod status;

pub const SALES_TABLE: &str = "sales-table";
pub const LINE_ITEMS_TABLE: &str = "line-items-table";
pub const PAYMENT_TABLE: &str = "payment-table";

/// Badge colour for a stored sale status.
pub(crate) fn status_variant(status: &str) -> &'static str {
    match status {
        "ongoing" => "info",
        "complete" => "success",
        "cancelled" => "warning",
        _ => "default",
    }
}
