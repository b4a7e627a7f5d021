//! Stock movements recorded against a single inventory item.

use super::{signed_quantity, transaction_variant, TRANSACTION_TABLE};
use crate::domain::model::{collections, Record, RecordExt, TransactionType};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::{InventoryLabels, InventoryTransactionLabels};
use crate::view::page::{FormPage, SelectOption};
use crate::view::table::{PrimaryAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    pub today: String,
    pub type_options: Vec<SelectOption>,
    pub labels: InventoryTransactionLabels,
}

pub fn type_label<'a>(kind: TransactionType, l: &'a InventoryTransactionLabels) -> &'a str {
    match kind {
        TransactionType::Received => &l.type_received,
        TransactionType::Sold => &l.type_sold,
        TransactionType::Adjusted => &l.type_adjusted,
        TransactionType::Transferred => &l.type_transferred,
        TransactionType::Returned => &l.type_returned,
        TransactionType::WriteOff => &l.type_write_off,
    }
}

/// New on-hand quantity after a movement. Outgoing movements never go below zero.
pub fn apply_movement(on_hand: f64, kind: TransactionType, quantity: f64) -> f64 {
    match kind.stock_sign() {
        1 => on_hand + quantity,
        -1 => (on_hand - quantity).max(0.0),
        _ => on_hand,
    }
}

pub async fn transactions_for(db: &dyn DataSource, item_id: &str) -> Vec<Record> {
    db.list_where(collections::INVENTORY_TRANSACTION, "inventory_item_id", item_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to list inventory_transaction: {}", e);
            Vec::new()
        })
}

pub fn build_transaction_table(
    item_id: &str,
    transactions: &[Record],
    l: &InventoryLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("transaction_date", &l.detail.date).width("130px"),
        TableColumn::new("transaction_type", &l.detail.r#type).width("120px"),
        TableColumn::new("quantity", &l.detail.quantity).width("100px").right(),
        TableColumn::new("reference", &l.detail.reference).unsortable(),
        TableColumn::new("serial_number", &l.detail.serial).width("150px").unsortable(),
        TableColumn::new("performed_by", &l.detail.performed_by).width("150px").unsortable(),
    ];

    let rows = transactions
        .iter()
        .map(|t| {
            let kind = t.str_field("transaction_type");
            TableRow::new(
                t.id(),
                vec![
                    TableCell::date(t.text("transaction_date")),
                    TableCell::badge(kind, transaction_variant(kind)),
                    TableCell::text(signed_quantity(t)),
                    TableCell::text(t.text("reference")),
                    TableCell::text(t.text("serial_number")),
                    TableCell::text(t.text("performed_by")),
                ],
            )
            .attr("transaction_date", t.text("transaction_date"))
            .attr("transaction_type", kind)
            .attr("quantity", t.text("quantity"))
        })
        .collect();

    let mut table = TableConfig::embedded(TRANSACTION_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::INVENTORY_TRANSACTION_TABLE, &[item_id]))
        .sorted_by("transaction_date", "desc")
        .empty(&l.detail.transaction_empty_title, &l.detail.transaction_empty_message)
        .primary(PrimaryAction::new(
            &l.transaction.record,
            &routes::url(routes::INVENTORY_TRANSACTION_ASSIGN, &[item_id]),
        ));
    table.show_search = true;
    table.show_entries = true;
    table.finish()
}

pub async fn table(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let transactions = transactions_for(deps.db.as_ref(), item_id).await;
    let table = build_transaction_table(item_id, &transactions, &deps.labels.inventory, deps.table_labels());
    ViewResult::ok("table-card", &table)
}

/// GET renders the movement drawer; POST records it and adjusts `quantity_on_hand`.
pub async fn assign(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let l = &deps.labels.inventory.transaction;

    if ctx.is_get() {
        let form = TransactionForm {
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
            type_options: SelectOption::list(
                TransactionType::ALL
                    .iter()
                    .map(|t| (t.as_str(), type_label(*t, l).to_string())),
                TransactionType::Received.as_str(),
            ),
            labels: l.clone(),
        };
        return ViewResult::ok(
            "transaction-drawer-form",
            &FormPage::add(routes::url(routes::INVENTORY_TRANSACTION_ASSIGN, &[item_id]), form),
        );
    }

    let form = &ctx.form;
    let kind = form.get("transaction_type");
    let quantity = form.number("quantity");
    let data = record! {
        "inventory_item_id" => item_id,
        "transaction_type" => kind,
        "quantity" => quantity,
        "transaction_date" => form.get("transaction_date"),
        "reference" => form.get("reference"),
        "serial_number" => form.get("serial_number"),
        "notes" => form.get("notes"),
        "performed_by" => "system",
    };
    if let Err(e) = deps.db.create(collections::INVENTORY_TRANSACTION, data).await {
        tracing::error!("Failed to create transaction: {}", e);
        return htmx_error("Failed to record stock movement");
    }

    let kind: TransactionType = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(item_id, "stock left unchanged: {}", e);
            return htmx_success(TRANSACTION_TABLE);
        }
    };
    match deps.db.read(collections::INVENTORY_ITEM, item_id).await {
        Ok(item) => {
            let on_hand = apply_movement(item.num("quantity_on_hand"), kind, quantity);
            if let Err(e) = deps
                .db
                .update(
                    collections::INVENTORY_ITEM,
                    item_id,
                    record! { "quantity_on_hand" => on_hand },
                )
                .await
            {
                tracing::warn!(item_id, "failed to adjust stock: {}", e);
            }
        }
        Err(e) => tracing::warn!(item_id, "stock left unchanged: {}", e),
    }

    htmx_success(TRANSACTION_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn setup(on_hand: f64) -> (Arc<InMemoryDataSource>, ViewDeps) {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(collections::INVENTORY_ITEM, record! { "id" => "i1", "quantity_on_hand" => on_hand })
            .await
            .unwrap();
        let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
        (db, deps)
    }

    fn movement(kind: &str, quantity: &str) -> ViewContext {
        ViewContext::post("/x")
            .with_param("id", "i1")
            .with_form("transaction_type", kind)
            .with_form("quantity", quantity)
            .with_form("transaction_date", "2026-10-01")
    }

    #[test]
    fn test_apply_movement() {
        assert_eq!(apply_movement(5.0, TransactionType::Received, 3.0), 8.0);
        assert_eq!(apply_movement(5.0, TransactionType::Returned, 1.0), 6.0);
        assert_eq!(apply_movement(5.0, TransactionType::Sold, 2.0), 3.0);
        assert_eq!(apply_movement(1.0, TransactionType::WriteOff, 4.0), 0.0);
        assert_eq!(apply_movement(5.0, TransactionType::Adjusted, 9.0), 5.0);
    }

    #[tokio::test]
    async fn test_received_adds_stock() {
        let (db, deps) = setup(5.0).await;
        let result = assign(&deps, &movement("received", "3")).await;
        assert!(result.header("HX-Trigger").unwrap().contains(TRANSACTION_TABLE));

        let item = db.read(collections::INVENTORY_ITEM, "i1").await.unwrap();
        assert_eq!(item.num("quantity_on_hand"), 8.0);
        let txns = db.list_simple(collections::INVENTORY_TRANSACTION).await.unwrap();
        assert_eq!(txns[0].str_field("performed_by"), "system");
    }

    #[tokio::test]
    async fn test_transfer_clamps_at_zero() {
        let (db, deps) = setup(2.0).await;
        assign(&deps, &movement("transferred", "10")).await;
        let item = db.read(collections::INVENTORY_ITEM, "i1").await.unwrap();
        assert_eq!(item.num("quantity_on_hand"), 0.0);
    }

    #[tokio::test]
    async fn test_table_signs_quantities() {
        let (_db, deps) = setup(10.0).await;
        assign(&deps, &movement("sold", "2")).await;
        let result = table(&deps, &ViewContext::get("/x").with_param("id", "i1")).await;
        let data = result.data().unwrap();
        assert_eq!(data["rows"][0]["cells"][2]["value"], "-2");
        assert_eq!(data["primaryAction"]["actionUrl"], "/action/inventory/detail/i1/transactions/assign");
    }

    #[tokio::test]
    async fn test_form_lists_every_type() {
        let (_db, deps) = setup(0.0).await;
        let result = assign(&deps, &ViewContext::get("/x").with_param("id", "i1")).await;
        let data = result.data().unwrap();
        assert_eq!(data["typeOptions"].as_array().unwrap().len(), 6);
        assert_eq!(data["typeOptions"][5]["label"], "Write-off");
    }
}
