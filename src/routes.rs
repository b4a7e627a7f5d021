//! Route patterns (router syntax) and builders for concrete links.
//!
//! Read pages live under `/app/...`, mutations under `/action/...`.

// Inventory
pub const INVENTORY_LIST: &str = "/app/inventory/list/:location";
pub const INVENTORY_DASHBOARD: &str = "/app/inventory/dashboard";
pub const INVENTORY_MOVEMENTS: &str = "/app/inventory/movements";
pub const INVENTORY_DETAIL: &str = "/app/inventory/detail/:id";
pub const INVENTORY_TAB_ACTION: &str = "/action/inventory/detail/:id/tab/:tab";
pub const INVENTORY_DASHBOARD_STATS: &str = "/action/inventory/dashboard/stats";
pub const INVENTORY_DASHBOARD_CHART: &str = "/action/inventory/dashboard/chart";
pub const INVENTORY_DASHBOARD_MOVEMENTS: &str = "/action/inventory/dashboard/movements";
pub const INVENTORY_DASHBOARD_ALERTS: &str = "/action/inventory/dashboard/alerts";
pub const INVENTORY_ADD: &str = "/action/inventory/add";
pub const INVENTORY_EDIT: &str = "/action/inventory/edit/:id";
pub const INVENTORY_DELETE: &str = "/action/inventory/delete";
pub const INVENTORY_BULK_DELETE: &str = "/action/inventory/bulk-delete";
pub const INVENTORY_SET_STATUS: &str = "/action/inventory/set-status";
pub const INVENTORY_BULK_SET_STATUS: &str = "/action/inventory/bulk-set-status";
pub const INVENTORY_SERIAL_TABLE: &str = "/action/inventory/detail/:id/serials/table";
pub const INVENTORY_SERIAL_ASSIGN: &str = "/action/inventory/detail/:id/serials/assign";
pub const INVENTORY_SERIAL_EDIT: &str = "/action/inventory/detail/:id/serials/edit/:sid";
pub const INVENTORY_SERIAL_REMOVE: &str = "/action/inventory/detail/:id/serials/remove";
pub const INVENTORY_TRANSACTION_TABLE: &str = "/action/inventory/detail/:id/transactions/table";
pub const INVENTORY_TRANSACTION_ASSIGN: &str = "/action/inventory/detail/:id/transactions/assign";
pub const INVENTORY_DEPRECIATION_ASSIGN: &str = "/action/inventory/detail/:id/depreciation/assign";
pub const INVENTORY_DEPRECIATION_EDIT: &str = "/action/inventory/detail/:id/depreciation/edit/:did";

// Sales
pub const SALES_LIST: &str = "/app/sales/list/:status";
pub const SALES_DETAIL: &str = "/app/sales/detail/:id";
pub const SALES_ADD: &str = "/action/sales/add";
pub const SALES_EDIT: &str = "/action/sales/edit/:id";
pub const SALES_DELETE: &str = "/action/sales/delete";
pub const SALES_BULK_DELETE: &str = "/action/sales/bulk-delete";
pub const SALES_SET_STATUS: &str = "/action/sales/set-status";
pub const SALES_BULK_SET_STATUS: &str = "/action/sales/bulk-set-status";
pub const SALES_ITEMS_TABLE: &str = "/action/sales/detail/:id/items/table";
pub const SALES_ITEMS_ADD: &str = "/action/sales/detail/:id/items/add";
pub const SALES_ITEMS_EDIT: &str = "/action/sales/detail/:id/items/edit/:item_id";
pub const SALES_ITEMS_REMOVE: &str = "/action/sales/detail/:id/items/remove";
pub const SALES_ITEMS_DISCOUNT: &str = "/action/sales/detail/:id/items/add-discount";
pub const SALES_PAYMENT_TABLE: &str = "/action/sales/detail/:id/payment/table";
pub const SALES_PAYMENT_ADD: &str = "/action/sales/detail/:id/payment/add";
pub const SALES_PAYMENT_EDIT: &str = "/action/sales/detail/:id/payment/edit/:pid";
pub const SALES_PAYMENT_REMOVE: &str = "/action/sales/detail/:id/payment/remove";

// Products
pub const PRODUCT_LIST: &str = "/app/products/list/:status";
pub const PRODUCT_DETAIL: &str = "/app/products/detail/:id";
pub const PRODUCT_TAB_ACTION: &str = "/action/products/detail/:id/tab/:tab";
pub const PRODUCT_ADD: &str = "/action/products/add";
pub const PRODUCT_EDIT: &str = "/action/products/edit/:id";
pub const PRODUCT_DELETE: &str = "/action/products/delete";
pub const PRODUCT_BULK_DELETE: &str = "/action/products/bulk-delete";
pub const PRODUCT_SET_STATUS: &str = "/action/products/set-status";
pub const PRODUCT_BULK_SET_STATUS: &str = "/action/products/bulk-set-status";
pub const PRODUCT_VARIANT_TABLE: &str = "/action/products/detail/:id/variants/table";
pub const PRODUCT_VARIANT_ASSIGN: &str = "/action/products/detail/:id/variants/assign";
pub const PRODUCT_VARIANT_EDIT: &str = "/action/products/detail/:id/variants/edit/:vid";
pub const PRODUCT_VARIANT_REMOVE: &str = "/action/products/detail/:id/variants/remove";
pub const PRODUCT_ATTRIBUTE_TABLE: &str = "/action/products/detail/:id/attributes/table";
pub const PRODUCT_ATTRIBUTE_ASSIGN: &str = "/action/products/detail/:id/attributes/assign";
pub const PRODUCT_ATTRIBUTE_REMOVE: &str = "/action/products/detail/:id/attributes/remove";

// Price lists
pub const PRICE_LIST_LIST: &str = "/app/price-lists/list/:status";
pub const PRICE_LIST_DETAIL: &str = "/app/price-lists/detail/:id";
pub const PRICE_LIST_ADD: &str = "/action/price-lists/add";
pub const PRICE_LIST_EDIT: &str = "/action/price-lists/edit/:id";
pub const PRICE_LIST_DELETE: &str = "/action/price-lists/delete";
pub const PRICE_LIST_BULK_DELETE: &str = "/action/price-lists/bulk-delete";
pub const PRICE_PRODUCT_ADD: &str = "/action/price-lists/:id/products/add";
pub const PRICE_PRODUCT_DELETE: &str = "/action/price-lists/:id/products/delete";

// Read-only lists
pub const PAYMENT_COLLECTION_LIST: &str = "/app/payment-collections/list/:status";
pub const PLAN_LIST: &str = "/app/plans/list/:status";
pub const SUBSCRIPTION_LIST: &str = "/app/subscriptions/list/:status";

pub const HEALTHZ: &str = "/healthz";

/// Substitutes `:name` segments in `pattern` with `values`, in order.
pub fn url(pattern: &str, values: &[&str]) -> String {
    let mut values = values.iter();
    pattern
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(_) => values.next().copied().unwrap_or(""),
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn with_query(path: String, key: &str, value: &str) -> String {
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, sep, encoded)
}

pub fn inventory_list(location: &str) -> String {
    url(INVENTORY_LIST, &[location])
}

pub fn inventory_detail(id: &str) -> String {
    url(INVENTORY_DETAIL, &[id])
}

pub fn inventory_detail_tab(id: &str, tab: &str) -> String {
    with_query(inventory_detail(id), "tab", tab)
}

pub fn sales_list(status: &str) -> String {
    url(SALES_LIST, &[status])
}

pub fn sales_detail(id: &str) -> String {
    url(SALES_DETAIL, &[id])
}

pub fn sales_detail_tab(id: &str, tab: &str) -> String {
    with_query(sales_detail(id), "tab", tab)
}

pub fn product_detail(id: &str) -> String {
    url(PRODUCT_DETAIL, &[id])
}

pub fn product_detail_tab(id: &str, tab: &str) -> String {
    with_query(product_detail(id), "tab", tab)
}

pub fn price_list_detail(id: &str) -> String {
    url(PRICE_LIST_DETAIL, &[id])
}

pub fn price_list_detail_tab(id: &str, tab: &str) -> String {
    with_query(price_list_detail(id), "tab", tab)
}
