//! Translatable strings for every module, with English defaults.
//!
//! Label files are JSON documents using camelCase keys; any key left out keeps
//! its default. `Translator` exposes the same tree as dotted lookup keys.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

macro_rules! label_group {
    ($(#[$meta:meta])* $name:ident { $($field:ident = $default:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $(pub $field: String),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.to_string()),+
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonLabels {
    pub table: CommonTableLabels,
    pub density: DensityLabels,
    pub pagination: PaginationLabels,
    pub bulk: CommonBulkLabels,
    pub buttons: CommonButtonLabels,
    pub errors: CommonErrorLabels,
}

label_group!(CommonTableLabels {
    search = "Search",
    search_placeholder = "Search...",
    filters = "Filters",
    filter_conditions = "Filter conditions",
    clear_all = "Clear all",
    add_condition = "Add condition",
    clear = "Clear",
    apply_filters = "Apply filters",
    sort = "Sort",
    columns = "Columns",
    export = "Export",
    show = "Show",
    entries = "entries",
    showing = "Showing",
    to = "to",
    of = "of",
    entries_label = "entries",
    select_all = "Select all",
    actions = "Actions",
});

label_group!(DensityLabels {
    default = "Default",
    comfortable = "Comfortable",
    compact = "Compact",
});

label_group!(PaginationLabels {
    prev = "Previous",
    next = "Next",
});

label_group!(CommonBulkLabels {
    select_all = "Select all",
    selected = "selected",
    clear_selection = "Clear selection",
});

label_group!(CommonButtonLabels {
    save = "Save",
    cancel = "Cancel",
    confirm = "Confirm",
});

label_group!(CommonErrorLabels {
    page_title = "Something went wrong",
    not_found = "The requested record could not be found.",
});

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryLabels {
    pub page: InventoryPageLabels,
    pub buttons: InventoryButtonLabels,
    pub columns: InventoryColumnLabels,
    pub empty: InventoryEmptyLabels,
    pub form: InventoryFormLabels,
    pub actions: RowActionLabels,
    #[serde(rename = "bulkActions")]
    pub bulk: BulkLabels,
    pub detail: InventoryDetailLabels,
    pub tabs: InventoryTabLabels,
    pub item_type: InventoryItemTypeLabels,
    pub status: StatusActionLabels,
    pub serial: InventorySerialLabels,
    pub transaction: InventoryTransactionLabels,
    pub depreciation: InventoryDepreciationLabels,
    pub dashboard: InventoryDashboardLabels,
    pub movements: InventoryMovementsLabels,
}

label_group!(InventoryPageLabels {
    heading = "Inventory",
    caption = "Stock levels for this location",
    location = "Location",
});

label_group!(InventoryButtonLabels {
    add_item = "Add Item",
});

label_group!(InventoryColumnLabels {
    product_name = "Product",
    sku = "SKU",
    item_type = "Type",
    on_hand = "On Hand",
    available = "Available",
    reorder_level = "Reorder Level",
    status = "Status",
});

label_group!(InventoryEmptyLabels {
    title = "No inventory items",
    message = "Add an item to start tracking stock at this location.",
});

label_group!(InventoryFormLabels {
    product = "Product",
    sku = "SKU",
    sku_placeholder = "e.g. MUG-001",
    on_hand = "Quantity on hand",
    reserved = "Quantity reserved",
    reorder_level = "Reorder level",
    unit_of_measure = "Unit of measure",
    location = "Location",
    notes = "Notes",
    notes_placeholder = "Optional notes",
    active = "Active",
});

label_group!(RowActionLabels {
    view = "View",
    edit = "Edit",
    delete = "Delete",
});

label_group!(BulkLabels {
    delete = "Delete selected",
});

label_group!(StatusActionLabels {
    activate = "Activate",
    deactivate = "Deactivate",
});

label_group!(InventoryDetailLabels {
    tab_basic_info = "Basic Info",
    tab_attributes = "Attributes",
    tab_serials = "Serials",
    tab_transactions = "Transactions",
    tab_audit_trail = "Audit Trail",
    item_info = "Item Information",
    product_name = "Product",
    sku = "SKU",
    location = "Location",
    on_hand = "On Hand",
    reserved = "Reserved",
    available = "Available",
    reorder_level = "Reorder Level",
    unit_of_measure = "Unit of Measure",
    status = "Status",
    notes = "Notes",
    attribute_name = "Attribute",
    attribute_value = "Value",
    serial_number = "Serial Number",
    imei = "IMEI",
    serial_status = "Status",
    warranty_end = "Warranty End",
    purchase_order = "Purchase Order",
    sale_reference = "Sale Reference",
    total_units = "Total Units",
    available_units = "Available",
    sold_units = "Sold",
    reserved_units = "Reserved",
    date = "Date",
    r#type = "Type",
    quantity = "Quantity",
    reference = "Reference",
    serial = "Serial",
    performed_by = "Performed By",
    audit_action = "Action",
    audit_user = "User",
    description = "Description",
    attribute_empty_title = "No attributes",
    attribute_empty_message = "This item's product has no attributes assigned.",
    serial_empty_title = "No serials",
    serial_empty_message = "Assign serial numbers to track individual units.",
    transaction_empty_title = "No transactions",
    transaction_empty_message = "Stock movements for this item will appear here.",
    audit_empty_title = "No audit entries",
    audit_empty_message = "Changes to this item will appear here.",
});

label_group!(InventoryTabLabels {
    info = "Info",
    attributes = "Attributes",
    serials = "Serials",
    transactions = "Transactions",
    depreciation = "Depreciation",
    audit = "Audit",
});

label_group!(InventoryItemTypeLabels {
    serialized = "Serialized",
    non_serialized = "Non-serialized",
    consumable = "Consumable",
});

label_group!(InventorySerialLabels {
    title = "Serial Numbers",
    serial_number = "Serial Number",
    imei = "IMEI",
    status = "Status",
    warranty_start = "Warranty Start",
    warranty_end = "Warranty End",
    purchase_order = "Purchase Order",
    sold_reference = "Sold Reference",
    assign = "Assign Serial",
    edit = "Edit Serial",
    remove = "Remove",
    empty = "No serial numbers yet",
    status_available = "Available",
    status_sold = "Sold",
    status_reserved = "Reserved",
    status_defective = "Defective",
    status_returned = "Returned",
});

label_group!(InventoryTransactionLabels {
    title = "Transactions",
    r#type = "Type",
    quantity = "Quantity",
    date = "Date",
    reference = "Reference",
    performed_by = "Performed By",
    record = "Record Movement",
    empty = "No transactions yet",
    type_received = "Received",
    type_sold = "Sold",
    type_adjusted = "Adjusted",
    type_transferred = "Transferred",
    type_returned = "Returned",
    type_write_off = "Write-off",
});

label_group!(InventoryDepreciationLabels {
    title = "Depreciation",
    method = "Method",
    cost_basis = "Cost Basis",
    salvage_value = "Salvage Value",
    useful_life = "Useful Life (months)",
    start_date = "Start Date",
    accumulated = "Accumulated",
    book_value = "Book Value",
    configure = "Configure Depreciation",
    edit = "Edit Depreciation",
    not_configured = "Depreciation has not been configured for this item.",
    method_straight_line = "Straight Line",
    method_declining_balance = "Declining Balance",
    method_sum_of_years = "Sum of Years' Digits",
});

label_group!(InventoryDashboardLabels {
    title = "Inventory Dashboard",
    total_stock_value = "Total Stock Value",
    low_stock_alerts = "Low Stock Alerts",
    stock_turnover = "Total Items",
    items_by_location = "Locations",
    depreciation_summary = "Depreciation",
    serial_unit_status = "Serial Units",
    recent_movements = "Recent Movements",
    category_distribution = "Item Types",
});

label_group!(InventoryMovementsLabels {
    title = "Stock Movements",
    subtitle = "Every stock movement across all locations",
});

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesLabels {
    pub page: SalesPageLabels,
    pub buttons: SalesButtonLabels,
    pub columns: SalesColumnLabels,
    pub empty: SalesEmptyLabels,
    pub form: SalesFormLabels,
    pub actions: RowActionLabels,
    #[serde(rename = "bulkActions")]
    pub bulk: BulkLabels,
    pub detail: SalesDetailLabels,
    pub status: SalesStatusLabels,
    pub payment: SalesPaymentLabels,
    pub line_item: SalesLineItemLabels,
}

label_group!(SalesPageLabels {
    heading = "Sales",
    heading_active = "Active Sales",
    heading_completed = "Completed Sales",
    heading_cancelled = "Cancelled Sales",
    caption = "All sales",
    caption_active = "Sales that are still in progress",
    caption_completed = "Sales that have been completed",
    caption_cancelled = "Sales that were cancelled",
});

label_group!(SalesButtonLabels {
    add_sale = "Add Sale",
});

label_group!(SalesColumnLabels {
    reference = "Reference",
    customer = "Customer",
    date = "Date",
    amount = "Amount",
    status = "Status",
});

label_group!(SalesEmptyLabels {
    active_title = "No active sales",
    active_message = "Create a sale to get started.",
    completed_title = "No completed sales",
    completed_message = "Completed sales will appear here.",
    cancelled_title = "No cancelled sales",
    cancelled_message = "Cancelled sales will appear here.",
});

label_group!(SalesFormLabels {
    customer = "Customer",
    date = "Date",
    amount = "Amount",
    currency = "Currency",
    reference = "Reference Number",
    reference_placeholder = "e.g. INV-0001",
    status = "Status",
    location = "Location",
    notes = "Notes",
    notes_placeholder = "Optional notes",
    active = "Active",
});

label_group!(SalesDetailLabels {
    page_title = "Sale",
    invoice_info = "Invoice Information",
    line_items = "Line Items",
    description = "Description",
    quantity = "Quantity",
    unit_price = "Unit Price",
    cost_price = "Cost Price",
    gross_profit = "Gross Profit",
    total = "Total",
    discount = "Discount",
    sub_total = "Subtotal",
    grand_total = "Grand Total",
    tab_basic_info = "Basic Info",
    tab_line_items = "Line Items",
    tab_payment = "Payment",
    tab_audit_trail = "Audit Trail",
    customer = "Customer",
    date = "Date",
    amount = "Amount",
    currency = "Currency",
    status = "Status",
    notes = "Notes",
    payment_method = "Payment Method",
    amount_paid = "Amount Paid",
    card_details = "Card Details",
    payment_date = "Payment Date",
    received_by = "Received By",
    payment_info = "Payment Information",
    audit_trail_coming_soon = "Audit trail is not available yet.",
    audit_action = "Action",
    audit_user = "User",
    audit_empty_title = "No audit entries",
    audit_empty_message = "Changes to this sale will appear here.",
    total_gross_profit = "Total Gross Profit",
});

label_group!(SalesStatusLabels {
    ongoing = "Ongoing",
    complete = "Complete",
    cancelled = "Cancelled",
    mark_complete = "Mark as complete",
    mark_cancelled = "Cancel sale",
    reopen = "Reopen",
});

label_group!(SalesPaymentLabels {
    title = "Payments",
    method = "Collection Method",
    amount = "Amount Paid",
    currency = "Currency",
    reference = "Reference Number",
    notes = "Notes",
    add = "Record Payment",
    edit = "Edit Payment",
    remove = "Remove",
    empty = "No payments recorded",
});

label_group!(SalesLineItemLabels {
    inventory_item = "Inventory Item",
    description = "Description",
    quantity = "Quantity",
    unit_price = "Unit Price",
    cost_price = "Cost Price",
    discount = "Discount",
    line_type = "Type",
    notes = "Notes",
    add = "Add Item",
    add_discount = "Add Discount",
    edit = "Edit Item",
    remove = "Remove",
    empty_title = "No line items",
    empty_message = "Add items to this sale.",
    type_item = "Item",
    type_discount = "Discount",
});

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductLabels {
    pub page: ProductPageLabels,
    pub buttons: ProductButtonLabels,
    pub columns: ProductColumnLabels,
    pub empty: ActiveInactiveEmptyLabels,
    pub form: ProductFormLabels,
    pub actions: RowActionLabels,
    #[serde(rename = "bulkActions")]
    pub bulk: BulkLabels,
    pub tabs: ProductTabLabels,
    pub detail: ProductDetailLabels,
    pub status: StatusActionLabels,
    pub variant: ProductVariantLabels,
    pub attribute: ProductAttributeLabels,
    pub pricing: ProductPricingLabels,
}

label_group!(ProductPageLabels {
    heading = "Products",
    heading_active = "Active Products",
    heading_inactive = "Inactive Products",
    caption = "All products",
    caption_active = "Products available for sale",
    caption_inactive = "Products that are no longer sold",
});

label_group!(ProductButtonLabels {
    add_product = "Add Product",
});

label_group!(ProductColumnLabels {
    name = "Name",
    description = "Description",
    price = "Price",
    status = "Status",
});

label_group!(ActiveInactiveEmptyLabels {
    active_title = "Nothing active yet",
    active_message = "Create one to get started.",
    inactive_title = "Nothing inactive",
    inactive_message = "Deactivated entries will appear here.",
});

label_group!(ProductFormLabels {
    name = "Name",
    description = "Description",
    description_placeholder = "Describe the product",
    price = "Price",
    currency = "Currency",
    active = "Active",
});

label_group!(ProductTabLabels {
    info = "Info",
    variants = "Variants",
    attributes = "Attributes",
    pricing = "Pricing",
});

label_group!(ProductDetailLabels {
    price = "Price",
    currency = "Currency",
    collections = "Collections",
    variant_count = "Variants",
    status = "Status",
    description = "Description",
});

label_group!(ProductVariantLabels {
    title = "Variants",
    sku = "SKU",
    price_override = "Price Override",
    attributes = "Attributes",
    assign = "Add Variant",
    edit = "Edit Variant",
    remove = "Remove",
    empty = "No variants yet",
});

label_group!(ProductAttributeLabels {
    title = "Attributes",
    name = "Attribute",
    code = "Code",
    default_value = "Default Value",
    assign = "Assign Attribute",
    remove = "Remove",
    empty = "No attributes assigned",
    select = "Please select an attribute",
});

label_group!(ProductPricingLabels {
    title = "Pricing",
    price_list = "Price List",
    amount = "Amount",
    valid_from = "Valid From",
    valid_to = "Valid To",
    validity = "Validity",
    empty = "This product is not on any price list",
    effective = "Effective",
    scheduled = "Scheduled",
    expired = "Expired",
});

// ---------------------------------------------------------------------------
// Price list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceListLabels {
    pub page: PriceListPageLabels,
    pub buttons: PriceListButtonLabels,
    pub columns: PriceListColumnLabels,
    pub empty: ActiveInactiveEmptyLabels,
    pub form: PriceListFormLabels,
    pub actions: RowActionLabels,
    #[serde(rename = "bulkActions")]
    pub bulk: BulkLabels,
    pub detail: PriceListDetailLabels,
}

label_group!(PriceListPageLabels {
    heading = "Price Lists",
    heading_active = "Active Price Lists",
    heading_inactive = "Inactive Price Lists",
    caption = "All price lists",
    caption_active = "Price lists currently in use",
    caption_inactive = "Price lists that are switched off",
});

label_group!(PriceListButtonLabels {
    add_price_list = "Add Price List",
    add_price = "Add Price",
});

label_group!(PriceListColumnLabels {
    name = "Name",
    date_start = "Start Date",
    date_end = "End Date",
    status = "Status",
});

label_group!(PriceListFormLabels {
    name = "Name",
    description = "Description",
    description_placeholder = "What is this price list for?",
    date_start = "Start Date",
    date_end = "End Date",
    active = "Active",
    product = "Product",
    amount = "Amount",
    currency = "Currency",
});

label_group!(PriceListDetailLabels {
    basic_info = "Basic Info",
    prices = "Prices",
    product_name = "Product",
    amount = "Amount",
    currency = "Currency",
    empty = "No prices on this list yet",
});

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub common: CommonLabels,
    pub inventory: InventoryLabels,
    pub sales: SalesLabels,
    pub product: ProductLabels,
    pub pricelist: PriceListLabels,
}

impl Labels {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 從 JSON 檔案載入標籤，缺少的鍵保留英文預設值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Dotted-key lookup over a `Labels` tree, e.g. `sales.form.customer`.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    entries: HashMap<String, String>,
}

impl Translator {
    pub fn new(labels: &Labels) -> Self {
        let mut entries = HashMap::new();
        match serde_json::to_value(labels) {
            Ok(tree) => flatten("", &tree, &mut entries),
            Err(e) => tracing::error!("failed to index labels: {}", e),
        }
        Self { entries }
    }

    /// Unknown keys come back unchanged so missing strings stay visible.
    pub fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}

/// Slug to display-name directory for store locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Locations {
    entries: Vec<(String, String)>,
}

impl Default for Locations {
    fn default() -> Self {
        Self::new([
            ("ayala-central-bloc", "Ayala Central Bloc"),
            ("sm-city-cebu", "SM City Cebu"),
            ("ayala-center-cebu", "Ayala Center Cebu"),
            ("robinsons-galleria", "Robinsons Galleria"),
        ])
    }
}

impl Locations {
    pub fn new<I, S, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: Into<String>,
        N: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(slug, name)| (slug.into(), name.into()))
                .collect(),
        }
    }

    /// Unknown slugs display as themselves.
    pub fn display_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, name)| name.as_str())
            .unwrap_or(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, n)| (s.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
