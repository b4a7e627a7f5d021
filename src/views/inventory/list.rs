use super::{available, format_available, is_low_stock, item_name, item_type_label, item_type_variant, INVENTORY_TABLE};
use crate::domain::model::{collections, format_quantity, ActiveStatus, ItemType, Record, RecordExt};
use crate::routes;
use crate::view::labels::InventoryLabels;
use crate::view::page::PageMeta;
use crate::view::table::{BulkAction, PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use crate::views::active_badge;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub location: String,
    pub table: TableConfig,
}

/// `/app/inventory/list/:location`; a missing location means the configured default.
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let location = match ctx.param("location") {
        "" => deps.settings.default_location.as_str(),
        location => location,
    };

    let records = match deps.db.list_simple(collections::INVENTORY_ITEM).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list inventory: {}", e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.inventory;
    let rows = build_rows(&records, location, l);

    let mut bulk = deps.bulk_config();
    bulk.actions = vec![
        BulkAction::set_status(
            "activate",
            &l.status.activate,
            routes::INVENTORY_BULK_SET_STATUS,
            ActiveStatus::Active.as_str(),
        ),
        BulkAction::set_status(
            "deactivate",
            &l.status.deactivate,
            routes::INVENTORY_BULK_SET_STATUS,
            ActiveStatus::Inactive.as_str(),
        ),
        BulkAction::delete(&l.bulk.delete, routes::INVENTORY_BULK_DELETE, "item(s)"),
    ];

    let table = TableConfig::list(INVENTORY_TABLE, columns(l), rows, deps.table_labels())
        .refresh_url(routes::inventory_list(location))
        .sorted_by("name", "asc")
        .empty(&l.empty.title, &l.empty.message)
        .primary(PrimaryAction::new(&l.buttons.add_item, routes::INVENTORY_ADD))
        .bulk(bulk)
        .finish();

    let title = format!("{} \u{2014} {}", l.page.heading, deps.location_name(location));
    let page = InventoryListPage {
        meta: PageMeta::new(ctx, &deps.labels.common, title)
            .nav("inventory", location)
            .header(&l.page.caption, "icon-package"),
        content_template: "inventory-list-content",
        location: location.to_string(),
        table,
    };
    ViewResult::ok("inventory-list", &page)
}

fn columns(l: &InventoryLabels) -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", &l.columns.product_name),
        TableColumn::new("sku", &l.columns.sku).width("150px"),
        TableColumn::new("item_type", &l.columns.item_type).width("130px"),
        TableColumn::new("on_hand", &l.columns.on_hand).width("120px").right(),
        TableColumn::new("available", &l.columns.available).width("120px").right(),
        TableColumn::new("reorder_level", &l.columns.reorder_level).width("140px").right(),
        TableColumn::new("status", &l.columns.status).width("120px"),
    ]
}

fn build_rows(records: &[Record], location: &str, l: &InventoryLabels) -> Vec<TableRow> {
    records
        .iter()
        .filter(|r| r.str_field("location_id") == location)
        .map(|r| {
            let id = r.id();
            let name = item_name(r);
            let item_type = ItemType::of_record(r);
            let on_hand = format_quantity(r.num("quantity_on_hand"));
            let available = format_available(available(r));
            let reorder = format_quantity(r.num("reorder_level"));
            let reorder_display = if is_low_stock(r) {
                format!("{} (!)", reorder)
            } else {
                reorder.clone()
            };
            let status = ActiveStatus::of_record(r);
            let detail = routes::inventory_detail(id);

            TableRow::new(
                id,
                vec![
                    TableCell::text(name),
                    TableCell::text(r.text("sku")),
                    TableCell::badge(item_type_label(item_type, l), item_type_variant(item_type)),
                    TableCell::text(on_hand.clone()),
                    TableCell::text(available.clone()),
                    TableCell::text(reorder_display),
                    active_badge(status),
                ],
            )
            .href(detail.clone())
            .attr("name", name)
            .attr("sku", r.text("sku"))
            .attr("item_type", item_type.as_str())
            .attr("on_hand", on_hand)
            .attr("reserved", format_quantity(r.num("quantity_reserved")))
            .attr("available", available)
            .attr("reorder_level", reorder)
            .attr("status", status.as_str())
            .actions(vec![
                TableAction::view(&l.actions.view, detail),
                TableAction::edit(
                    &l.actions.edit,
                    routes::url(routes::INVENTORY_EDIT, &[id]),
                    &l.actions.edit,
                ),
                TableAction::delete(
                    &l.actions.delete,
                    routes::with_query(routes::INVENTORY_DELETE.to_string(), "id", id),
                    name,
                ),
            ])
        })
        .collect()
}
