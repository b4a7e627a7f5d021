use super::PRICE_LISTS_TABLE;
use crate::domain::model::ActiveStatus;
use crate::domain::pricing::{list_price_lists, PriceList};
use crate::routes;
use crate::view::labels::PriceListLabels;
use crate::view::page::PageMeta;
use crate::view::table::{BulkAction, PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use crate::views::active_badge;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListListPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub status: String,
    pub table: TableConfig,
}

/// `/app/price-lists/list/:status`, where status follows the `active` flag.
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let status = match ctx.param("status") {
        "" => "active",
        status => status,
    };

    let lists = match list_price_lists(deps.db.as_ref()).await {
        Ok(lists) => lists,
        Err(e) => {
            tracing::error!("Failed to list price lists: {}", e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.pricelist;
    let (heading, caption, empty_title, empty_message) = match status {
        "inactive" => (
            &l.page.heading_inactive,
            &l.page.caption_inactive,
            &l.empty.inactive_title,
            &l.empty.inactive_message,
        ),
        "active" => (&l.page.heading_active, &l.page.caption_active, &l.empty.active_title, &l.empty.active_message),
        _ => (&l.page.heading, &l.page.caption, &l.empty.active_title, &l.empty.active_message),
    };

    let mut bulk = deps.bulk_config();
    bulk.actions = vec![BulkAction::delete(&l.bulk.delete, routes::PRICE_LIST_BULK_DELETE, "price list(s)")];

    let table = TableConfig::list(PRICE_LISTS_TABLE, columns(l), build_rows(&lists, status, l), deps.table_labels())
        .refresh_url(routes::url(routes::PRICE_LIST_LIST, &[status]))
        .sorted_by("name", "asc")
        .empty(empty_title, empty_message)
        .primary(PrimaryAction::new(&l.buttons.add_price_list, routes::PRICE_LIST_ADD))
        .bulk(bulk)
        .finish();

    let page = PriceListListPage {
        meta: PageMeta::new(ctx, &deps.labels.common, heading.clone())
            .nav("price-lists", status)
            .header(caption.clone(), "icon-tag"),
        content_template: "pricelist-list-content",
        status: status.to_string(),
        table,
    };
    ViewResult::ok("pricelist-list", &page)
}

fn columns(l: &PriceListLabels) -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", &l.columns.name),
        TableColumn::new("date_start", &l.columns.date_start).width("150px"),
        TableColumn::new("date_end", &l.columns.date_end).width("150px"),
        TableColumn::new("status", &l.columns.status).width("120px"),
    ]
}

fn build_rows(lists: &[PriceList], status: &str, l: &PriceListLabels) -> Vec<TableRow> {
    lists
        .iter()
        .filter_map(|pl| {
            let record_status = if pl.active { ActiveStatus::Active } else { ActiveStatus::Inactive };
            if record_status.as_str() != status {
                return None;
            }
            let detail = routes::price_list_detail(&pl.id);
            let date_end = match pl.date_end_string.as_deref() {
                Some(end) if !end.is_empty() => end,
                _ => "—",
            };

            let row = TableRow::new(
                pl.id.clone(),
                vec![
                    TableCell::text(pl.name.clone()),
                    TableCell::date(pl.date_start_string.clone()),
                    TableCell::date(date_end),
                    active_badge(record_status),
                ],
            )
            .href(detail.clone())
            .attr("name", pl.name.clone())
            .attr("date_start", pl.date_start_string.clone())
            .attr("date_end", pl.date_end_string.clone().unwrap_or_default())
            .attr("status", record_status.as_str())
            .actions(vec![
                TableAction::view(&l.actions.view, detail),
                TableAction::edit(&l.actions.edit, routes::url(routes::PRICE_LIST_EDIT, &[&pl.id]), &l.actions.edit),
                TableAction::delete(
                    &l.actions.delete,
                    routes::with_query(routes::PRICE_LIST_DELETE.to_string(), "id", &pl.id),
                    &pl.name,
                ),
            ]);
            Some(row)
        })
        .collect()
}
