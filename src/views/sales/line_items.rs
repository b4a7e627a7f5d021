//! Line items on a sale. Every mutation recomputes `revenue.total_amount`.

use super::LINE_ITEMS_TABLE;
use crate::domain::model::{collections, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::SalesLineItemLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::table::{TableAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::money;
use serde::Serialize;

pub const LINE_TYPE_ITEM: &str = "item";
pub const LINE_TYPE_DISCOUNT: &str = "discount";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemForm {
    pub id: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub cost_price: String,
    pub discount: String,
    pub notes: String,
    pub inventory_item_id: String,
    pub line_item_type: String,
    pub inventory_options: Vec<SelectOption>,
    pub labels: SalesLineItemLabels,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountForm {
    pub description: String,
    pub amount: String,
    pub labels: SalesLineItemLabels,
}

/// `qty * unit_price - discount`; a zero quantity counts as one.
pub fn line_total(quantity: f64, unit_price: f64, discount: f64) -> f64 {
    let quantity = if quantity == 0.0 { 1.0 } else { quantity };
    quantity * unit_price - discount
}

fn parse(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Sums the sale's line totals into `total_amount`. Failures are logged only.
pub async fn recalculate_total(db: &dyn DataSource, sale_id: &str) {
    let items = match db
        .list_where(collections::REVENUE_LINE_ITEM, "revenue_id", sale_id)
        .await
    {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to list line items for total recalculation: {}", e);
            return;
        }
    };

    let total: f64 = items.iter().map(|i| i.num("total")).sum();
    if let Err(e) = db
        .update(
            collections::REVENUE,
            sale_id,
            record! { "total_amount" => format!("{:.2}", total) },
        )
        .await
    {
        tracing::error!("Failed to update revenue total for {}: {}", sale_id, e);
    }
}

pub fn build_line_item_table(
    sale_id: &str,
    items: &[Record],
    currency: &str,
    l: &SalesLineItemLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("type", &l.line_type).width("90px").unsortable(),
        TableColumn::new("description", &l.description).unsortable(),
        TableColumn::new("quantity", &l.quantity).width("80px").unsortable().right(),
        TableColumn::new("unit_price", &l.unit_price).width("130px").unsortable().right(),
        TableColumn::new("discount", &l.discount).width("100px").unsortable().right(),
        TableColumn::new("total", "Total").width("130px").unsortable().right(),
    ];

    let rows = items
        .iter()
        .map(|item| {
            let id = item.id();
            let is_discount = item.str_field("line_item_type") == LINE_TYPE_DISCOUNT;
            let (badge, variant) = if is_discount {
                (l.type_discount.as_str(), "warning")
            } else {
                (l.type_item.as_str(), "info")
            };

            let mut actions = Vec::new();
            if !is_discount {
                actions.push(TableAction::edit(
                    &l.edit,
                    routes::url(routes::SALES_ITEMS_EDIT, &[sale_id, id]),
                    &l.edit,
                ));
            }
            actions.push(TableAction::delete(
                &l.remove,
                routes::with_query(
                    routes::url(routes::SALES_ITEMS_REMOVE, &[sale_id]),
                    "itemId",
                    id,
                ),
                item.str_field("description"),
            ));

            TableRow::new(
                id,
                vec![
                    TableCell::badge(badge, variant),
                    TableCell::text(item.text("description")),
                    TableCell::text(item.text("quantity")),
                    TableCell::text(money(currency, &item.text("unit_price"))),
                    TableCell::text(item.text("discount")),
                    TableCell::text(money(currency, &item.text("total"))),
                ],
            )
            .actions(actions)
        })
        .collect();

    TableConfig::embedded(LINE_ITEMS_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::SALES_ITEMS_TABLE, &[sale_id]))
        .empty(&l.empty_title, &l.empty_message)
        .finish()
}

/// `<select>` options for inventory items: `name (sku)`, falling back to the id.
pub async fn inventory_options(db: &dyn DataSource, current: &str) -> Vec<SelectOption> {
    let items = match db.list_simple(collections::INVENTORY_ITEM).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to list inventory items: {}", e);
            return Vec::new();
        }
    };

    items
        .iter()
        .map(|item| {
            let name = match item.str_field("name") {
                "" => item.str_field("product_name"),
                name => name,
            };
            let sku = item.str_field("sku");
            let label = match (name, sku) {
                ("", _) => item.id().to_string(),
                (name, "") => name.to_string(),
                (name, sku) => format!("{} ({})", name, sku),
            };
            SelectOption {
                selected: item.id() == current,
                value: item.id().to_string(),
                label,
            }
        })
        .collect()
}

/// Table fragment for HTMX refreshes.
pub async fn table(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");
    let sale = match deps.db.read(collections::REVENUE, sale_id).await {
        Ok(sale) => sale,
        Err(e) => {
            tracing::error!("Failed to read revenue {}: {}", sale_id, e);
            return htmx_error("Failed to load sale");
        }
    };
    let items = match super::status::line_items_for(deps.db.as_ref(), sale_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to list line items: {}", e);
            Vec::new()
        }
    };

    let table = build_line_item_table(
        sale_id,
        &items,
        sale.str_field("currency"),
        &deps.labels.sales.line_item,
        deps.table_labels(),
    );
    ViewResult::ok("table-card", &table)
}

fn line_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    let total = line_total(
        parse(form.get("quantity")),
        parse(form.get("unit_price")),
        parse(form.get("discount")),
    );
    record! {
        "description" => form.get("description"),
        "quantity" => form.get("quantity"),
        "unit_price" => form.get("unit_price"),
        "cost_price" => form.get("cost_price"),
        "discount" => form.get("discount"),
        "total" => format!("{:.2}", total),
        "inventory_item_id" => form.get("inventory_item_id"),
        "inventory_serial_id" => form.get("inventory_serial_id"),
        "notes" => form.get("notes"),
    }
}

pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");

    if ctx.is_get() {
        let form = LineItemForm {
            quantity: "1".to_string(),
            line_item_type: LINE_TYPE_ITEM.to_string(),
            inventory_options: inventory_options(deps.db.as_ref(), "").await,
            labels: deps.labels.sales.line_item.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "sales-line-item-drawer-form",
            &FormPage::add(routes::url(routes::SALES_ITEMS_ADD, &[sale_id]), form),
        );
    }

    let mut data = line_record(ctx);
    data.insert("revenue_id".into(), sale_id.into());
    data.insert("line_item_type".into(), LINE_TYPE_ITEM.into());

    if let Err(e) = deps.db.create(collections::REVENUE_LINE_ITEM, data).await {
        tracing::error!("Failed to create line item: {}", e);
        return htmx_error("Failed to add line item");
    }

    recalculate_total(deps.db.as_ref(), sale_id).await;
    htmx_success(LINE_ITEMS_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");
    let item_id = ctx.param("item_id");

    if ctx.is_get() {
        let record = match deps.db.read(collections::REVENUE_LINE_ITEM, item_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to read line item {}: {}", item_id, e);
                return htmx_error("Line item not found");
            }
        };
        let inventory_item_id = record.text("inventory_item_id");
        let form = LineItemForm {
            id: item_id.to_string(),
            description: record.text("description"),
            quantity: record.text("quantity"),
            unit_price: record.text("unit_price"),
            cost_price: record.text("cost_price"),
            discount: record.text("discount"),
            notes: record.text("notes"),
            inventory_options: inventory_options(deps.db.as_ref(), &inventory_item_id).await,
            inventory_item_id,
            line_item_type: LINE_TYPE_ITEM.to_string(),
            labels: deps.labels.sales.line_item.clone(),
        };
        return ViewResult::ok(
            "sales-line-item-drawer-form",
            &FormPage::edit(
                routes::url(routes::SALES_ITEMS_EDIT, &[sale_id, item_id]),
                form,
            ),
        );
    }

    if let Err(e) = deps
        .db
        .update(collections::REVENUE_LINE_ITEM, item_id, line_record(ctx))
        .await
    {
        tracing::error!("Failed to update line item {}: {}", item_id, e);
        return htmx_error("Failed to update line item");
    }

    recalculate_total(deps.db.as_ref(), sale_id).await;
    htmx_success(LINE_ITEMS_TABLE)
}

pub async fn remove(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");
    let item_id = ctx.query_or_form("itemId");
    if item_id.is_empty() {
        return htmx_error("Line item ID is required");
    }

    if let Err(e) = deps.db.delete(collections::REVENUE_LINE_ITEM, item_id).await {
        tracing::error!("Failed to delete line item {}: {}", item_id, e);
        return htmx_error("Failed to remove line item");
    }

    recalculate_total(deps.db.as_ref(), sale_id).await;
    htmx_success(LINE_ITEMS_TABLE)
}

pub async fn add_discount(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");

    if ctx.is_get() {
        let form = DiscountForm {
            labels: deps.labels.sales.line_item.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "sales-line-item-discount-form",
            &FormPage::add(routes::url(routes::SALES_ITEMS_DISCOUNT, &[sale_id]), form),
        );
    }

    let amount = match ctx.form.get("amount").trim().parse::<f64>() {
        Ok(amount) if amount > 0.0 => amount,
        _ => return htmx_error("Discount amount must be a positive number"),
    };

    let data = record! {
        "revenue_id" => sale_id,
        "description" => ctx.form.get("description"),
        "quantity" => "1",
        "unit_price" => "0",
        "cost_price" => "0",
        "discount" => "0",
        "total" => format!("-{:.2}", amount),
        "line_item_type" => LINE_TYPE_DISCOUNT,
    };
    if let Err(e) = deps.db.create(collections::REVENUE_LINE_ITEM, data).await {
        tracing::error!("Failed to create discount line item: {}", e);
        return htmx_error("Failed to add discount");
    }

    recalculate_total(deps.db.as_ref(), sale_id).await;
    htmx_success(LINE_ITEMS_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn deps() -> (Arc<InMemoryDataSource>, ViewDeps) {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(
            collections::REVENUE,
            record! { "id" => "s1", "currency" => "PHP", "total_amount" => "0.00" },
        )
        .await
        .unwrap();
        let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
        (db, deps)
    }

    fn sale_ctx(path: &str) -> ViewContext {
        ViewContext::post(path).with_param("id", "s1")
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(2.0, 50.0, 10.0), 90.0);
        assert_eq!(line_total(0.0, 50.0, 0.0), 50.0);
    }

    #[tokio::test]
    async fn test_add_recomputes_sale_total() {
        let (db, deps) = deps().await;
        let ctx = sale_ctx("/action/sales/detail/s1/items/add")
            .with_form("description", "Mug")
            .with_form("quantity", "2")
            .with_form("unit_price", "50")
            .with_form("discount", "10");
        let result = add(&deps, &ctx).await;
        assert!(result.header("HX-Trigger").unwrap().contains(LINE_ITEMS_TABLE));

        let items = db.list_simple(collections::REVENUE_LINE_ITEM).await.unwrap();
        assert_eq!(items[0].str_field("total"), "90.00");
        assert_eq!(items[0].str_field("line_item_type"), "item");
        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("total_amount"), "90.00");
    }

    #[tokio::test]
    async fn test_discount_must_be_positive() {
        let (_db, deps) = deps().await;
        for amount in ["0", "-5", "abc", ""] {
            let ctx = sale_ctx("/action/sales/detail/s1/items/add-discount").with_form("amount", amount);
            let result = add_discount(&deps, &ctx).await;
            assert_eq!(
                result.header("HX-Error-Message"),
                Some("Discount amount must be a positive number")
            );
        }
    }

    #[tokio::test]
    async fn test_discount_reduces_total_and_remove_restores_it() {
        let (db, deps) = deps().await;
        let ctx = sale_ctx("/x")
            .with_form("quantity", "1")
            .with_form("unit_price", "200");
        add(&deps, &ctx).await;
        add_discount(&deps, &sale_ctx("/x").with_form("amount", "25.5")).await;

        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("total_amount"), "174.50");

        let discount = db
            .list_where(collections::REVENUE_LINE_ITEM, "line_item_type", "discount")
            .await
            .unwrap();
        assert_eq!(discount[0].str_field("total"), "-25.50");

        let remove_ctx = sale_ctx("/x").with_query("itemId", discount[0].id());
        remove(&deps, &remove_ctx).await;
        let sale = db.read(collections::REVENUE, "s1").await.unwrap();
        assert_eq!(sale.str_field("total_amount"), "200.00");
    }

    #[tokio::test]
    async fn test_table_marks_discount_rows() {
        let (db, deps) = deps().await;
        add_discount(&deps, &sale_ctx("/x").with_form("amount", "5")).await;
        db.create(
            collections::REVENUE_LINE_ITEM,
            record! { "revenue_id" => "other", "total" => "1" },
        )
        .await
        .unwrap();

        let result = table(&deps, &ViewContext::get("/x").with_param("id", "s1")).await;
        assert_eq!(result.template(), Some("table-card"));
        let rows = result.data().unwrap()["rows"].as_array().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["cells"][0]["variant"], "warning");
        assert_eq!(rows[0]["actions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_requires_item_id() {
        let (_db, deps) = deps().await;
        let result = remove(&deps, &sale_ctx("/x")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Line item ID is required"));
    }

    #[tokio::test]
    async fn test_inventory_option_labels() {
        let (db, _deps) = deps().await;
        db.create(collections::INVENTORY_ITEM, record! { "id" => "i1", "name" => "Mug", "sku" => "M-1" })
            .await
            .unwrap();
        db.create(collections::INVENTORY_ITEM, record! { "id" => "i2" })
            .await
            .unwrap();
        let options = inventory_options(db.as_ref(), "i2").await;
        assert_eq!(options[0].label, "Mug (M-1)");
        assert_eq!(options[1].label, "i2");
        assert!(options[1].selected);
    }
}
