use super::{format_price, product_status, status_variant, PRODUCTS_TABLE};
use crate::domain::model::{collections, ActiveStatus, Record, RecordExt};
use crate::routes;
use crate::view::labels::ProductLabels;
use crate::view::page::PageMeta;
use crate::view::table::{BulkAction, PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub status: String,
    pub table: TableConfig,
}

/// `/app/products/list/:status`, defaulting to `active`.
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let status = match ctx.param("status") {
        "" => "active",
        status => status,
    };

    let records = match deps.db.list_simple(collections::PRODUCT).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.product;
    let (heading, caption, empty_title, empty_message) = match status {
        "active" => (&l.page.heading_active, &l.page.caption_active, &l.empty.active_title, &l.empty.active_message),
        "inactive" => (
            &l.page.heading_inactive,
            &l.page.caption_inactive,
            &l.empty.inactive_title,
            &l.empty.inactive_message,
        ),
        _ => (&l.page.heading, &l.page.caption, &l.empty.active_title, &l.empty.active_message),
    };

    let mut bulk = deps.bulk_config();
    bulk.actions = vec![
        BulkAction::set_status(
            "activate",
            &l.status.activate,
            routes::PRODUCT_BULK_SET_STATUS,
            ActiveStatus::Active.as_str(),
        ),
        BulkAction::set_status(
            "deactivate",
            &l.status.deactivate,
            routes::PRODUCT_BULK_SET_STATUS,
            ActiveStatus::Inactive.as_str(),
        ),
        BulkAction::delete(&l.bulk.delete, routes::PRODUCT_BULK_DELETE, "product(s)"),
    ];

    let table = TableConfig::list(PRODUCTS_TABLE, columns(l), build_rows(&records, status, l), deps.table_labels())
        .refresh_url(routes::url(routes::PRODUCT_LIST, &[status]))
        .sorted_by("name", "asc")
        .empty(empty_title, empty_message)
        .primary(PrimaryAction::new(&l.buttons.add_product, routes::PRODUCT_ADD))
        .bulk(bulk)
        .finish();

    let page = ProductListPage {
        meta: PageMeta::new(ctx, &deps.labels.common, heading.clone())
            .nav("products", status)
            .header(caption.clone(), "icon-package"),
        content_template: "product-list-content",
        status: status.to_string(),
        table,
    };
    ViewResult::ok("product-list", &page)
}

fn columns(l: &ProductLabels) -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", &l.columns.name),
        TableColumn::new("description", &l.columns.description).unsortable(),
        TableColumn::new("price", &l.columns.price).width("150px").right(),
        TableColumn::new("status", &l.columns.status).width("120px"),
    ]
}

/// Records without any status are listed under whichever status was asked for.
fn build_rows(records: &[Record], status: &str, l: &ProductLabels) -> Vec<TableRow> {
    records
        .iter()
        .filter(|r| {
            let stored = product_status(r);
            stored.is_empty() || stored == status
        })
        .map(|r| {
            let id = r.id();
            let name = r.text("name");
            let record_status = match product_status(r) {
                "" => status,
                s => s,
            };
            let price = r.num("price");
            let detail = routes::product_detail(id);

            TableRow::new(
                id,
                vec![
                    TableCell::text(name.clone()),
                    TableCell::text(r.text("description")),
                    TableCell::text(format_price(r.str_field("currency"), price)),
                    TableCell::badge(record_status, status_variant(record_status)),
                ],
            )
            .href(detail.clone())
            .attr("name", name.clone())
            .attr("price", format!("{:.2}", price))
            .attr("status", record_status)
            .actions(vec![
                TableAction::view(&l.actions.view, detail),
                TableAction::edit(&l.actions.edit, routes::url(routes::PRODUCT_EDIT, &[id]), &l.actions.edit),
                TableAction::delete(
                    &l.actions.delete,
                    routes::with_query(routes::PRODUCT_DELETE.to_string(), "id", id),
                    &name,
                ),
            ])
        })
        .collect()
}
