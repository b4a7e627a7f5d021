use super::{item_name, signed_quantity, transaction_variant, MOVEMENTS_TABLE};
use crate::domain::model::{collections, Record, RecordExt};
use crate::routes;
use crate::view::labels::InventoryLabels;
use crate::view::page::PageMeta;
use crate::view::table::{TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementsPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub table: TableConfig,
}

fn build_table(
    deps: &ViewDeps,
    transactions: &[Record],
    items: &[Record],
    l: &InventoryLabels,
    labels: TableLabels,
) -> TableConfig {
    let items: HashMap<&str, &Record> = items.iter().map(|i| (i.id(), i)).collect();

    let columns = vec![
        TableColumn::new("transaction_date", &l.detail.date).width("130px"),
        TableColumn::new("item_name", &l.columns.product_name),
        TableColumn::new("location", &l.detail.location).width("170px"),
        TableColumn::new("transaction_type", &l.detail.r#type).width("120px"),
        TableColumn::new("quantity", &l.detail.quantity).width("100px").right(),
        TableColumn::new("serial_number", &l.detail.serial).width("150px").unsortable(),
        TableColumn::new("reference", &l.detail.reference).unsortable(),
        TableColumn::new("performed_by", &l.detail.performed_by).width("150px").unsortable(),
    ];

    let rows = transactions
        .iter()
        .map(|t| {
            let item_id = t.str_field("inventory_item_id");
            let item = items.get(item_id).copied();
            let name = item.map(item_name).unwrap_or(item_id);
            let location = item
                .map(|i| deps.location_name(i.str_field("location_id")))
                .unwrap_or("");
            let kind = t.str_field("transaction_type");

            let mut row = TableRow::new(
                t.id(),
                vec![
                    TableCell::date(t.text("transaction_date")),
                    TableCell::text(name),
                    TableCell::text(location),
                    TableCell::badge(kind, transaction_variant(kind)),
                    TableCell::text(signed_quantity(t)),
                    TableCell::text(t.text("serial_number")),
                    TableCell::text(t.text("reference")),
                    TableCell::text(t.text("performed_by")),
                ],
            )
            .attr("transaction_date", t.text("transaction_date"))
            .attr("item_name", name)
            .attr("location", location)
            .attr("transaction_type", kind)
            .attr("quantity", t.text("quantity"));
            if !item_id.is_empty() {
                row = row.href(routes::inventory_detail_tab(item_id, "transactions"));
            }
            row
        })
        .collect();

    TableConfig::list(MOVEMENTS_TABLE, columns, rows, labels)
        .refresh_url(routes::INVENTORY_MOVEMENTS.to_string())
        .sorted_by("transaction_date", "desc")
        .empty(&l.detail.transaction_empty_title, &l.detail.transaction_empty_message)
        .finish()
}

/// `/app/inventory/movements`: every stock movement across all locations.
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let transactions = match deps.db.list_simple(collections::INVENTORY_TRANSACTION).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list inventory_transaction: {}", e);
            return ViewResult::error(e);
        }
    };
    let items = deps
        .db
        .list_simple(collections::INVENTORY_ITEM)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("movements shown without item names: {}", e);
            Vec::new()
        });

    let l = &deps.labels.inventory;
    let page = MovementsPage {
        meta: PageMeta::new(ctx, &deps.labels.common, l.movements.title.clone())
            .nav("inventory", "movements")
            .header(&l.movements.subtitle, "icon-repeat"),
        content_template: "inventory-movements-content",
        table: build_table(deps, &transactions, &items, l, deps.table_labels()),
    };
    ViewResult::ok("inventory-movements", &page)
}
