//! Serial numbers of serialized inventory items.

use super::{serial_status_variant, SERIAL_TABLE};
use crate::domain::model::{collections, Record, RecordExt, SerialStatus};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::{InventoryLabels, InventorySerialLabels};
use crate::view::page::{FormPage, SelectOption};
use crate::view::table::{PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialSummary {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
    pub reserved: usize,
}

impl SerialSummary {
    pub fn of(serials: &[Record]) -> Self {
        let mut summary = Self {
            total: serials.len(),
            ..Default::default()
        };
        for serial in serials {
            match serial.str_field("status").parse::<SerialStatus>() {
                Ok(SerialStatus::Available) => summary.available += 1,
                Ok(SerialStatus::Sold) => summary.sold += 1,
                Ok(SerialStatus::Reserved) => summary.reserved += 1,
                _ => {}
            }
        }
        summary
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialForm {
    pub id: String,
    pub serial_number: String,
    pub imei: String,
    pub status: String,
    pub warranty_start: String,
    pub warranty_end: String,
    pub purchase_order: String,
    pub sold_reference: String,
    pub status_options: Vec<SelectOption>,
    pub labels: InventorySerialLabels,
}

fn status_options(l: &InventorySerialLabels, current: &str) -> Vec<SelectOption> {
    SelectOption::list(
        [
            (SerialStatus::Available.as_str(), l.status_available.clone()),
            (SerialStatus::Sold.as_str(), l.status_sold.clone()),
            (SerialStatus::Reserved.as_str(), l.status_reserved.clone()),
            (SerialStatus::Defective.as_str(), l.status_defective.clone()),
            (SerialStatus::Returned.as_str(), l.status_returned.clone()),
        ],
        current,
    )
}

pub async fn serials_for(db: &dyn DataSource, item_id: &str) -> Vec<Record> {
    db.list_where(collections::INVENTORY_SERIAL, "inventory_item_id", item_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to list inventory_serial: {}", e);
            Vec::new()
        })
}

pub fn build_serial_table(
    item_id: &str,
    serials: &[Record],
    l: &InventoryLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("serial_number", &l.detail.serial_number),
        TableColumn::new("imei", &l.detail.imei).width("180px").unsortable(),
        TableColumn::new("status", &l.detail.serial_status).width("120px"),
        TableColumn::new("warranty_end", &l.detail.warranty_end).width("140px"),
        TableColumn::new("purchase_order", &l.detail.purchase_order).width("140px").unsortable(),
        TableColumn::new("sold_reference", &l.detail.sale_reference).width("140px").unsortable(),
    ];

    let rows = serials
        .iter()
        .map(|s| {
            let id = s.id();
            let serial_number = s.text("serial_number");
            let status = s.str_field("status");
            TableRow::new(
                id,
                vec![
                    TableCell::text(serial_number.clone()),
                    TableCell::text(s.text("imei")),
                    TableCell::badge(status, serial_status_variant(status)),
                    TableCell::date(s.text("warranty_end")),
                    TableCell::text(s.text("purchase_order")),
                    TableCell::text(s.text("sold_reference")),
                ],
            )
            .attr("serial_number", serial_number.clone())
            .attr("status", status)
            .attr("warranty_end", s.text("warranty_end"))
            .actions(vec![
                TableAction::edit(
                    &l.serial.edit,
                    routes::url(routes::INVENTORY_SERIAL_EDIT, &[item_id, id]),
                    &l.serial.edit,
                ),
                TableAction::delete(
                    &l.serial.remove,
                    routes::with_query(
                        routes::url(routes::INVENTORY_SERIAL_REMOVE, &[item_id]),
                        "id",
                        id,
                    ),
                    &serial_number,
                ),
            ])
        })
        .collect();

    let mut table = TableConfig::embedded(SERIAL_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::INVENTORY_SERIAL_TABLE, &[item_id]))
        .sorted_by("serial_number", "asc")
        .empty(&l.detail.serial_empty_title, &l.detail.serial_empty_message)
        .primary(PrimaryAction::new(
            &l.serial.assign,
            &routes::url(routes::INVENTORY_SERIAL_ASSIGN, &[item_id]),
        ));
    table.show_search = true;
    table.show_entries = true;
    table.finish()
}

pub async fn table(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let serials = serials_for(deps.db.as_ref(), item_id).await;
    let table = build_serial_table(item_id, &serials, &deps.labels.inventory, deps.table_labels());
    ViewResult::ok("table-card", &table)
}

fn serial_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    record! {
        "serial_number" => form.get("serial_number"),
        "imei" => form.get("imei"),
        "status" => form.get("status"),
        "warranty_start" => form.get("warranty_start"),
        "warranty_end" => form.get("warranty_end"),
        "purchase_order" => form.get("purchase_order"),
        "sold_reference" => form.get("sold_reference"),
    }
}

pub async fn assign(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let l = &deps.labels.inventory.serial;

    if ctx.is_get() {
        let status = SerialStatus::Available.as_str();
        let form = SerialForm {
            status: status.to_string(),
            status_options: status_options(l, status),
            labels: l.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "serial-drawer-form",
            &FormPage::add(routes::url(routes::INVENTORY_SERIAL_ASSIGN, &[item_id]), form),
        );
    }

    let mut data = serial_record(ctx);
    data.insert("inventory_item_id".into(), item_id.into());
    if let Err(e) = deps.db.create(collections::INVENTORY_SERIAL, data).await {
        tracing::error!("Failed to create serial: {}", e);
        return htmx_error("Failed to create serial");
    }
    htmx_success(SERIAL_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let item_id = ctx.param("id");
    let serial_id = ctx.param("sid");
    let l = &deps.labels.inventory.serial;

    if ctx.is_get() {
        let record = match deps.db.read(collections::INVENTORY_SERIAL, serial_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to read serial {}: {}", serial_id, e);
                return htmx_error("Serial not found");
            }
        };
        let status = record.text("status");
        let form = SerialForm {
            id: serial_id.to_string(),
            serial_number: record.text("serial_number"),
            imei: record.text("imei"),
            status_options: status_options(l, &status),
            status,
            warranty_start: record.text("warranty_start"),
            warranty_end: record.text("warranty_end"),
            purchase_order: record.text("purchase_order"),
            sold_reference: record.text("sold_reference"),
            labels: l.clone(),
        };
        return ViewResult::ok(
            "serial-drawer-form",
            &FormPage::edit(
                routes::url(routes::INVENTORY_SERIAL_EDIT, &[item_id, serial_id]),
                form,
            ),
        );
    }

    if let Err(e) = deps
        .db
        .update(collections::INVENTORY_SERIAL, serial_id, serial_record(ctx))
        .await
    {
        tracing::error!("Failed to update serial {}: {}", serial_id, e);
        return htmx_error("Failed to update serial");
    }
    htmx_success(SERIAL_TABLE)
}

pub async fn remove(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    crate::views::delete_one(deps.db.as_ref(), ctx, collections::INVENTORY_SERIAL, SERIAL_TABLE, "Serial")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    fn deps(db: Arc<InMemoryDataSource>) -> ViewDeps {
        ViewDeps::new(db, Arc::new(Labels::default()), ViewSettings::default())
    }

    #[test]
    fn test_summary_counts() {
        let serials = vec![
            record! { "status" => "available" },
            record! { "status" => "available" },
            record! { "status" => "sold" },
            record! { "status" => "reserved" },
            record! { "status" => "defective" },
        ];
        let summary = SerialSummary::of(&serials);
        assert_eq!(
            summary,
            SerialSummary { total: 5, available: 2, sold: 1, reserved: 1 }
        );
    }

    #[tokio::test]
    async fn test_assign_then_table() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/x")
            .with_param("id", "i1")
            .with_form("serial_number", "SN-001")
            .with_form("status", "available");
        let result = assign(&deps, &ctx).await;
        assert!(result.header("HX-Trigger").unwrap().contains(SERIAL_TABLE));

        let result = table(&deps, &ViewContext::get("/x").with_param("id", "i1")).await;
        let data = result.data().unwrap();
        assert_eq!(data["id"], SERIAL_TABLE);
        assert_eq!(data["rows"][0]["cells"][0]["value"], "SN-001");
        assert_eq!(data["rows"][0]["cells"][2]["variant"], "success");
    }

    #[tokio::test]
    async fn test_assign_form_defaults_to_available() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let result = assign(&deps, &ViewContext::get("/x").with_param("id", "i1")).await;
        let data = result.data().unwrap();
        assert_eq!(data["status"], "available");
        assert_eq!(data["statusOptions"][0]["selected"], true);
        assert_eq!(data["statusOptions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_edit_missing_serial() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let ctx = ViewContext::get("/x").with_param("id", "i1").with_param("sid", "nope");
        assert_eq!(edit(&deps, &ctx).await.header("HX-Error-Message"), Some("Serial not found"));
    }

    #[tokio::test]
    async fn test_remove_requires_id() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let result = remove(&deps, &ViewContext::post("/x").with_param("id", "i1")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Serial ID is required"));
    }
}
