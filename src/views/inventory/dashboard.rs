//! Inventory dashboard: KPI widgets and the HTMX partials that refresh them.

use super::{is_low_stock, item_name};
use crate::domain::model::{collections, ItemType, Record, RecordExt, SerialStatus};
use crate::domain::ports::DataSource;
use crate::view::labels::InventoryLabels;
use crate::view::page::PageMeta;
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

const RECENT_MOVEMENTS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub icon: String,
    pub value: String,
    pub label: String,
    pub trend: String,
    pub trend_up: bool,
    pub color: String,
}

impl Widget {
    fn new(icon: &str, value: String, label: &str, color: &str) -> Self {
        Self {
            icon: icon.into(),
            value,
            label: label.into(),
            color: color.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub labels: InventoryLabels,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Alert {
    id: String,
    name: String,
    sku: String,
    location_id: String,
    quantity_on_hand: f64,
    quantity_reserved: f64,
    reorder_level: f64,
}

async fn list_or_empty(db: &dyn DataSource, collection: &str) -> Vec<Record> {
    db.list_simple(collection).await.unwrap_or_else(|e| {
        tracing::error!("Dashboard: failed to list {}: {}", collection, e);
        Vec::new()
    })
}

/// Aggregates for the eight KPI widgets.
#[derive(Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub stock_value: f64,
    pub low_stock: usize,
    pub total_items: usize,
    pub item_types: usize,
    pub serials_available: usize,
    pub serials_total: usize,
    pub cost_basis: f64,
    pub book_value: f64,
}

impl DashboardStats {
    pub fn compute(items: &[Record], serials: &[Record], depreciations: &[Record]) -> Self {
        let types: HashSet<ItemType> = items.iter().map(ItemType::of_record).collect();
        Self {
            stock_value: items
                .iter()
                .map(|i| i.num("quantity_on_hand") * i.num("unit_cost"))
                .sum(),
            low_stock: items.iter().filter(|i| is_low_stock(i)).count(),
            total_items: items.len(),
            item_types: types.len(),
            serials_available: serials
                .iter()
                .filter(|s| s.str_field("status") == SerialStatus::Available.as_str())
                .count(),
            serials_total: serials.len(),
            cost_basis: depreciations.iter().map(|d| d.num("cost_basis")).sum(),
            book_value: depreciations.iter().map(|d| d.num("book_value")).sum(),
        }
    }
}

pub async fn build_widgets(deps: &ViewDeps) -> Vec<Widget> {
    let db = deps.db.as_ref();
    let items = list_or_empty(db, collections::INVENTORY_ITEM).await;
    let serials = list_or_empty(db, collections::INVENTORY_SERIAL).await;
    let depreciations = list_or_empty(db, collections::INVENTORY_DEPRECIATION).await;
    let stats = DashboardStats::compute(&items, &serials, &depreciations);
    let l = &deps.labels.inventory.dashboard;

    vec![
        Widget::new("icon-dollar-sign", format!("{:.0}", stats.stock_value), &l.total_stock_value, "terracotta"),
        Widget::new("icon-alert-triangle", stats.low_stock.to_string(), &l.low_stock_alerts, "amber"),
        Widget::new("icon-repeat", stats.total_items.to_string(), &l.stock_turnover, "sage"),
        Widget::new(
            "icon-map-pin",
            deps.settings.locations.len().to_string(),
            &l.items_by_location,
            "navy",
        ),
        Widget::new(
            "icon-trending-down",
            format!("{:.0} / {:.0}", stats.cost_basis, stats.book_value),
            &l.depreciation_summary,
            "terracotta",
        ),
        Widget::new(
            "icon-hash",
            format!("{} / {}", stats.serials_available, stats.serials_total),
            &l.serial_unit_status,
            "sage",
        ),
        Widget::new("icon-activity", "\u{2014}".to_string(), &l.recent_movements, "navy"),
        Widget::new(
            "icon-pie-chart",
            format!("{} types", stats.item_types),
            &l.category_distribution,
            "amber",
        ),
    ]
}

/// `/app/inventory/dashboard`
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let l = &deps.labels.inventory;
    let page = DashboardPage {
        meta: PageMeta::new(ctx, &deps.labels.common, l.dashboard.title.clone())
            .nav("inventory", "dashboard")
            .header("", "icon-briefcase"),
        content_template: "inventory-dashboard-content",
        labels: l.clone(),
        widgets: build_widgets(deps).await,
    };
    ViewResult::ok("inventory-dashboard", &page)
}

pub async fn stats(deps: &ViewDeps, _ctx: &ViewContext) -> ViewResult {
    let data = serde_json::json!({
        "widgets": build_widgets(deps).await,
        "labels": &deps.labels.inventory,
    });
    ViewResult::ok("inventory-dashboard-stats", &data)
}

pub async fn chart(deps: &ViewDeps, _ctx: &ViewContext) -> ViewResult {
    let data = serde_json::json!({ "labels": &deps.labels.inventory });
    ViewResult::ok("inventory-dashboard-chart", &data)
}

/// Ten most recent movements, newest first.
pub async fn movements(deps: &ViewDeps, _ctx: &ViewContext) -> ViewResult {
    let mut transactions = list_or_empty(deps.db.as_ref(), collections::INVENTORY_TRANSACTION).await;
    transactions.sort_by(|a, b| b.text("transaction_date").cmp(&a.text("transaction_date")));
    transactions.truncate(RECENT_MOVEMENTS);

    let data = serde_json::json!({
        "transactions": transactions.into_iter().map(Value::Object).collect::<Vec<_>>(),
        "labels": &deps.labels.inventory,
    });
    ViewResult::ok("inventory-dashboard-movements", &data)
}

pub async fn alerts(deps: &ViewDeps, _ctx: &ViewContext) -> ViewResult {
    let items = list_or_empty(deps.db.as_ref(), collections::INVENTORY_ITEM).await;
    let alerts: Vec<Alert> = items
        .iter()
        .filter(|i| is_low_stock(i))
        .map(|i| Alert {
            id: i.id().to_string(),
            name: item_name(i).to_string(),
            sku: i.text("sku"),
            location_id: i.text("location_id"),
            quantity_on_hand: i.num("quantity_on_hand"),
            quantity_reserved: i.num("quantity_reserved"),
            reorder_level: i.num("reorder_level"),
        })
        .collect();

    let data = serde_json::json!({
        "alerts": alerts,
        "labels": &deps.labels.inventory,
    });
    ViewResult::ok("inventory-dashboard-alerts", &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn deps() -> ViewDeps {
        let db = InMemoryDataSource::new();
        let items = [
            record! { "id" => "i1", "name" => "Mug", "quantity_on_hand" => 10, "unit_cost" => 25, "reorder_level" => 12 },
            record! { "id" => "i2", "name" => "Phone", "quantity_on_hand" => 2, "unit_cost" => "1000", "item_type" => "serialized" },
            record! { "id" => "i3", "name" => "Tape", "quantity_on_hand" => 5, "item_type" => "consumable" },
        ];
        for item in items {
            db.create(collections::INVENTORY_ITEM, item).await.unwrap();
        }
        for status in ["available", "sold", "available"] {
            db.create(collections::INVENTORY_SERIAL, record! { "status" => status })
                .await
                .unwrap();
        }
        db.create(
            collections::INVENTORY_DEPRECIATION,
            record! { "cost_basis" => 12000, "book_value" => 9000.4 },
        )
        .await
        .unwrap();
        for day in 1..=12 {
            db.create(
                collections::INVENTORY_TRANSACTION,
                record! { "transaction_date" => format!("2026-10-{:02}", day), "quantity" => day },
            )
            .await
            .unwrap();
        }
        ViewDeps::new(Arc::new(db), Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_widgets() {
        let deps = deps().await;
        let widgets = build_widgets(&deps).await;
        let values: Vec<&str> = widgets.iter().map(|w| w.value.as_str()).collect();
        assert_eq!(
            values,
            ["2250", "1", "3", "4", "12000 / 9000", "2 / 3", "\u{2014}", "3 types"]
        );
        assert_eq!(widgets[0].label, "Total Stock Value");
    }

    #[tokio::test]
    async fn test_page_meta() {
        let deps = deps().await;
        let result = page(&deps, &ViewContext::get("/app/inventory/dashboard")).await;
        assert_eq!(result.template(), Some("inventory-dashboard"));
        let data = result.data().unwrap();
        assert_eq!(data["title"], "Inventory Dashboard");
        assert_eq!(data["headerIcon"], "icon-briefcase");
        assert_eq!(data["activeSubNav"], "dashboard");
        assert_eq!(data["widgets"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_recent_movements_newest_first() {
        let deps = deps().await;
        let result = movements(&deps, &ViewContext::get("/x")).await;
        let txns = result.data().unwrap()["transactions"].as_array().unwrap().clone();
        assert_eq!(txns.len(), 10);
        assert_eq!(txns[0]["transaction_date"], "2026-10-12");
        assert_eq!(txns[9]["transaction_date"], "2026-10-03");
    }

    #[tokio::test]
    async fn test_alerts_only_low_stock() {
        let deps = deps().await;
        let result = alerts(&deps, &ViewContext::get("/x")).await;
        assert_eq!(result.template(), Some("inventory-dashboard-alerts"));
        let alerts = result.data().unwrap()["alerts"].as_array().unwrap().clone();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["name"], "Mug");
    }
}
