//! Inventory item detail page and its HTMX tab partials.

use super::depreciation::{self, DepreciationInfo};
use super::serial::{build_serial_table, serials_for, SerialSummary};
use super::transaction::{build_transaction_table, transactions_for};
use super::{available, format_available, item_name, item_type_label, item_type_variant};
use crate::domain::model::{collections, ItemType, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::routes;
use crate::view::labels::InventoryLabels;
use crate::view::page::{activate_tab, PageMeta, TabItem};
use crate::view::table::{TableColumn, TableConfig, TableLabels};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeEntry {
    pub name: String,
    pub value: String,
}

/// Item data shared by the full page and the tab partials.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item: Value,
    pub labels: InventoryLabels,
    pub active_tab: String,
    pub is_serialized: bool,
    pub item_type: String,
    pub item_type_label: String,
    pub item_type_variant: String,
    pub location_name: String,
    pub available_qty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_summary: Option<SerialSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<DepreciationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_table: Option<TableConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDetailPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub tab_items: Vec<TabItem>,
    #[serde(flatten)]
    pub view: ItemView,
}

fn tab_items(l: &InventoryLabels, id: &str, is_serialized: bool) -> Vec<TabItem> {
    let tab = |key: &str, label: &str, icon: &str| {
        TabItem::new(key, label, routes::inventory_detail_tab(id, key), icon)
    };
    let mut tabs = vec![
        tab("info", &l.tabs.info, "icon-info"),
        tab("attributes", &l.tabs.attributes, "icon-layers"),
    ];
    if is_serialized {
        tabs.push(tab("serials", &l.tabs.serials, "icon-hash"));
    }
    tabs.push(tab("transactions", &l.tabs.transactions, "icon-repeat"));
    tabs.push(tab("depreciation", &l.tabs.depreciation, "icon-trending-down"));
    tabs.push(tab("audit", &l.tabs.audit, "icon-clock"));
    tabs
}

/// Product attributes joined with attribute names. Per-item values win over
/// the product default; attributes without a name are dropped.
pub async fn load_attributes(db: &dyn DataSource, item: &Record) -> Vec<AttributeEntry> {
    let product_id = item.str_field("product_id");
    if product_id.is_empty() {
        return Vec::new();
    }

    let assigned = match db
        .list_where(collections::PRODUCT_ATTRIBUTE, "product_id", product_id)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list product_attribute: {}", e);
            return Vec::new();
        }
    };
    let attributes = match db.list_simple(collections::ATTRIBUTE).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list attribute: {}", e);
            return Vec::new();
        }
    };
    let item_values = match db
        .list_where(collections::INVENTORY_ATTRIBUTE, "inventory_item_id", item.id())
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list inventory_attribute: {}", e);
            return Vec::new();
        }
    };

    let names: HashMap<&str, &str> = attributes
        .iter()
        .map(|a| (a.id(), a.str_field("name")))
        .collect();
    let values: HashMap<&str, &str> = item_values
        .iter()
        .map(|v| (v.str_field("attribute_id"), v.str_field("value")))
        .collect();

    assigned
        .iter()
        .filter_map(|pa| {
            let attribute_id = pa.str_field("attribute_id");
            let name = names.get(attribute_id).copied().unwrap_or("");
            if name.is_empty() {
                return None;
            }
            let value = match values.get(attribute_id).copied().unwrap_or("") {
                "" => pa.str_field("default_value"),
                value => value,
            };
            Some(AttributeEntry {
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

fn build_audit_table(l: &InventoryLabels, labels: TableLabels) -> TableConfig {
    let columns = vec![
        TableColumn::new("date", &l.detail.date).width("160px"),
        TableColumn::new("action", &l.detail.audit_action),
        TableColumn::new("user", &l.detail.audit_user).width("180px"),
        TableColumn::new("description", &l.detail.description).unsortable(),
    ];
    let mut table = TableConfig::embedded("audit-trail-table", columns, Vec::new(), labels)
        .sorted_by("date", "desc")
        .empty(&l.detail.audit_empty_title, &l.detail.audit_empty_message);
    table.show_search = true;
    table.show_entries = true;
    table.finish()
}

/// Builds the item view and loads only the data the active tab needs.
async fn item_view(deps: &ViewDeps, item: Record, tab: &str) -> ItemView {
    let l = &deps.labels.inventory;
    let id = item.id().to_string();
    let item_type = ItemType::of_record(&item);
    let db = deps.db.as_ref();

    let mut view = ItemView {
        labels: l.clone(),
        active_tab: tab.to_string(),
        is_serialized: item_type == ItemType::Serialized,
        item_type: item_type.as_str().to_string(),
        item_type_label: item_type_label(item_type, l).to_string(),
        item_type_variant: item_type_variant(item_type).to_string(),
        location_name: deps.location_name(item.str_field("location_id")).to_string(),
        available_qty: format_available(available(&item)),
        ..Default::default()
    };

    match tab {
        "attributes" => view.attributes = Some(load_attributes(db, &item).await),
        "serials" => {
            let serials = serials_for(db, &id).await;
            view.serial_summary = Some(SerialSummary::of(&serials));
            view.serial_table = Some(build_serial_table(&id, &serials, l, deps.table_labels()));
        }
        "transactions" => {
            let transactions = transactions_for(db, &id).await;
            view.transaction_table = Some(build_transaction_table(&id, &transactions, l, deps.table_labels()));
        }
        "depreciation" => view.depreciation = depreciation::load(db, &id, &l.depreciation).await,
        "audit" => view.audit_table = Some(build_audit_table(l, deps.table_labels())),
        _ => {}
    }

    view.item = Value::Object(item);
    view
}

/// `/app/inventory/detail/:id?tab=…`
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let item = match deps.db.read(collections::INVENTORY_ITEM, id).await {
        Ok(item) => item,
        Err(e) => {
            tracing::error!("Failed to read inventory_item {}: {}", id, e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.inventory;
    let title = format!(
        "{} \u{2014} {}",
        item_name(&item),
        deps.location_name(item.str_field("location_id"))
    );
    let is_serialized = ItemType::of_record(&item) == ItemType::Serialized;
    let (tabs, active_tab) = activate_tab(tab_items(l, id, is_serialized), ctx.query_param("tab"));

    let page = InventoryDetailPage {
        meta: PageMeta::new(ctx, &deps.labels.common, title)
            .nav("inventory", item.str_field("location_id"))
            .header(&l.detail.item_info, "icon-package"),
        content_template: "inventory-detail-content",
        tab_items: tabs,
        view: item_view(deps, item, &active_tab).await,
    };
    ViewResult::ok("inventory-detail", &page)
}

/// Tab partial rendered with `inventory-tab-{tab}`.
pub async fn tab(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let tab = ctx.param("tab");
    let item = match deps.db.read(collections::INVENTORY_ITEM, id).await {
        Ok(item) => item,
        Err(e) => {
            tracing::error!("Failed to read inventory_item {}: {}", id, e);
            return ViewResult::error(e);
        }
    };

    let view = item_view(deps, item, tab).await;
    ViewResult::ok(&format!("inventory-tab-{}", tab), &view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn setup() -> (Arc<InMemoryDataSource>, ViewDeps) {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(
            collections::INVENTORY_ITEM,
            record! {
                "id" => "i1",
                "name" => "Phone",
                "product_id" => "p1",
                "location_id" => "sm-city-cebu",
                "item_type" => "serialized",
                "quantity_on_hand" => 3,
            },
        )
        .await
        .unwrap();
        let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
        (db, deps)
    }

    #[tokio::test]
    async fn test_page_title_and_serial_tab() {
        let (_db, deps) = setup().await;
        let ctx = ViewContext::get("/app/inventory/detail/i1").with_param("id", "i1");
        let result = page(&deps, &ctx).await;
        let data = result.data().unwrap();
        assert_eq!(data["title"], "Phone \u{2014} SM City Cebu");
        assert_eq!(data["activeTab"], "info");
        assert_eq!(data["isSerialized"], true);
        assert_eq!(data["availableQty"], "3");
        let keys: Vec<&str> = data["tabItems"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, ["info", "attributes", "serials", "transactions", "depreciation", "audit"]);
    }

    #[tokio::test]
    async fn test_non_serialized_item_has_no_serial_tab() {
        let (db, deps) = setup().await;
        db.update(collections::INVENTORY_ITEM, "i1", record! { "item_type" => "consumable" })
            .await
            .unwrap();
        let ctx = ViewContext::get("/x").with_param("id", "i1").with_query("tab", "serials");
        let data = page(&deps, &ctx).await.data().cloned().unwrap();
        assert_eq!(data["tabItems"].as_array().unwrap().len(), 5);
        assert_eq!(data["activeTab"], "info");
    }

    #[tokio::test]
    async fn test_attribute_join() {
        let (db, _deps) = setup().await;
        for (id, name) in [("a1", "Color"), ("a2", "Storage"), ("a3", "")] {
            db.create(collections::ATTRIBUTE, record! { "id" => id, "name" => name })
                .await
                .unwrap();
        }
        for (attr, default) in [("a1", "Black"), ("a2", "64GB"), ("a3", "x")] {
            db.create(
                collections::PRODUCT_ATTRIBUTE,
                record! { "product_id" => "p1", "attribute_id" => attr, "default_value" => default },
            )
            .await
            .unwrap();
        }
        db.create(
            collections::INVENTORY_ATTRIBUTE,
            record! { "inventory_item_id" => "i1", "attribute_id" => "a2", "value" => "128GB" },
        )
        .await
        .unwrap();

        let item = db.read(collections::INVENTORY_ITEM, "i1").await.unwrap();
        let entries = load_attributes(db.as_ref(), &item).await;
        assert_eq!(
            entries,
            vec![
                AttributeEntry { name: "Color".into(), value: "Black".into() },
                AttributeEntry { name: "Storage".into(), value: "128GB".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_tab_partial_template() {
        let (db, deps) = setup().await;
        db.create(
            collections::INVENTORY_SERIAL,
            record! { "inventory_item_id" => "i1", "serial_number" => "SN1", "status" => "sold" },
        )
        .await
        .unwrap();
        let ctx = ViewContext::get("/x").with_param("id", "i1").with_param("tab", "serials");
        let result = tab(&deps, &ctx).await;
        assert_eq!(result.template(), Some("inventory-tab-serials"));
        let data = result.data().unwrap();
        assert_eq!(data["serialSummary"]["sold"], 1);
        assert_eq!(data["serialTable"]["rows"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_audit_tab() {
        let (_db, deps) = setup().await;
        let ctx = ViewContext::get("/x").with_param("id", "i1").with_query("tab", "audit");
        let data = page(&deps, &ctx).await.data().cloned().unwrap();
        assert_eq!(data["auditTable"]["id"], "audit-trail-table");
    }
}
