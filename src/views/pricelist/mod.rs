//! Price lists and the per-product prices they carry.

pub mod action;
pub mod detail;
pub mod list;
pub mod price_product;

pub const PRICE_LISTS_TABLE: &str = "price-lists-table";
pub const PRICE_PRODUCTS_TABLE: &str = "price-products-table";
