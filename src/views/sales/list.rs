use super::{status_variant, SALES_TABLE};
use crate::domain::model::{collections, Record, RecordExt, SaleStatus};
use crate::routes;
use crate::view::labels::SalesLabels;
use crate::view::page::PageMeta;
use crate::view::table::{
    BulkAction, PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableRow,
};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use crate::views::money;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesListPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub status: String,
    pub table: TableConfig,
}

struct StatusCopy<'a> {
    heading: &'a str,
    caption: &'a str,
    empty_title: &'a str,
    empty_message: &'a str,
}

fn status_copy<'a>(l: &'a SalesLabels, slug: &str) -> StatusCopy<'a> {
    match slug {
        "active" => StatusCopy {
            heading: &l.page.heading_active,
            caption: &l.page.caption_active,
            empty_title: &l.empty.active_title,
            empty_message: &l.empty.active_message,
        },
        "completed" => StatusCopy {
            heading: &l.page.heading_completed,
            caption: &l.page.caption_completed,
            empty_title: &l.empty.completed_title,
            empty_message: &l.empty.completed_message,
        },
        "cancelled" => StatusCopy {
            heading: &l.page.heading_cancelled,
            caption: &l.page.caption_cancelled,
            empty_title: &l.empty.cancelled_title,
            empty_message: &l.empty.cancelled_message,
        },
        _ => StatusCopy {
            heading: &l.page.heading,
            caption: &l.page.caption,
            empty_title: &l.empty.active_title,
            empty_message: &l.empty.active_message,
        },
    }
}

/// `/app/sales/list/:status`, defaulting to `active`.
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let slug = match ctx.param("status") {
        "" => "active",
        slug => slug,
    };

    let records = match deps.db.list_simple(collections::REVENUE).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list sales: {}", e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.sales;
    let stored = SaleStatus::from_list_slug(slug)
        .map(|s| s.as_str())
        .unwrap_or(slug);
    let rows = build_rows(&records, stored, l);
    let copy = status_copy(l, slug);

    let mut bulk = deps.bulk_config();
    bulk.actions = vec![
        BulkAction::set_status(
            "complete",
            &l.status.mark_complete,
            routes::SALES_BULK_SET_STATUS,
            SaleStatus::Complete.as_str(),
        ),
        BulkAction::set_status(
            "cancel",
            &l.status.mark_cancelled,
            routes::SALES_BULK_SET_STATUS,
            SaleStatus::Cancelled.as_str(),
        ),
        BulkAction::delete(&l.bulk.delete, routes::SALES_BULK_DELETE, "sale(s)"),
    ];

    let table = TableConfig::list(SALES_TABLE, columns(l), rows, deps.table_labels())
        .refresh_url(routes::sales_list(slug))
        .sorted_by("date", "desc")
        .empty(copy.empty_title, copy.empty_message)
        .primary(PrimaryAction::new(&l.buttons.add_sale, routes::SALES_ADD))
        .bulk(bulk)
        .finish();

    let page = SalesListPage {
        meta: PageMeta::new(ctx, &deps.labels.common, copy.heading)
            .nav("sales", &format!("sales-{}", slug))
            .header(copy.caption, "icon-shopping-bag"),
        content_template: "sales-list-content",
        status: slug.to_string(),
        table,
    };
    ViewResult::ok("sales-list", &page)
}

fn columns(l: &SalesLabels) -> Vec<TableColumn> {
    vec![
        TableColumn::new("reference", &l.columns.reference),
        TableColumn::new("customer", &l.columns.customer),
        TableColumn::new("date", &l.columns.date).width("140px"),
        TableColumn::new("amount", &l.columns.amount).width("140px").right(),
        TableColumn::new("status", &l.columns.status).width("120px"),
    ]
}

fn build_rows(records: &[Record], status: &str, l: &SalesLabels) -> Vec<TableRow> {
    records
        .iter()
        .filter(|r| r.str_field("status") == status)
        .map(|r| {
            let id = r.id();
            let reference = r.text("reference_number");
            let customer = r.text("name");
            let date = r.text("revenue_date_string");
            let amount = money(r.str_field("currency"), &r.text("total_amount"));
            let record_status = r.str_field("status");

            TableRow::new(
                id,
                vec![
                    TableCell::text(reference.clone()),
                    TableCell::text(customer.clone()),
                    TableCell::date(date.clone()),
                    TableCell::text(amount),
                    TableCell::badge(record_status, status_variant(record_status)),
                ],
            )
            .href(routes::sales_detail(id))
            .attr("reference", reference.clone())
            .attr("customer", customer)
            .attr("date", date)
            .attr("amount", r.text("total_amount"))
            .attr("status", record_status)
            .actions(vec![
                TableAction::view(&l.actions.view, routes::sales_detail(id)),
                TableAction::edit(
                    &l.actions.edit,
                    routes::url(routes::SALES_EDIT, &[id]),
                    &l.actions.edit,
                ),
                TableAction::delete(
                    &l.actions.delete,
                    routes::with_query(routes::SALES_DELETE.to_string(), "id", id),
                    &reference,
                ),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use crate::domain::ports::DataSource;
    use std::sync::Arc;

    async fn deps() -> ViewDeps {
        let db = InMemoryDataSource::new();
        for (id, status, amount) in [("s1", "ongoing", "100.00"), ("s2", "complete", "50.00"), ("s3", "ongoing", "75.00")] {
            db.create(
                collections::REVENUE,
                record! {
                    "id" => id,
                    "reference_number" => format!("INV-{}", id),
                    "name" => "Juan",
                    "status" => status,
                    "currency" => "PHP",
                    "total_amount" => amount,
                    "revenue_date_string" => "2026-10-01",
                },
            )
            .await
            .unwrap();
        }
        ViewDeps::new(Arc::new(db), Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_active_slug_shows_ongoing_sales() {
        let deps = deps().await;
        let ctx = ViewContext::get("/app/sales/list/active").with_param("status", "active");
        let result = list(&deps, &ctx).await;
        assert_eq!(result.template(), Some("sales-list"));

        let data = result.data().unwrap();
        assert_eq!(data["title"], "Active Sales");
        let rows = data["table"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["cells"][3]["value"], "PHP 100.00");
        assert_eq!(rows[0]["cells"][4]["variant"], "info");
        assert_eq!(data["table"]["primaryAction"]["actionUrl"], "/action/sales/add");
    }

    #[tokio::test]
    async fn test_missing_status_defaults_to_active() {
        let deps = deps().await;
        let result = list(&deps, &ViewContext::get("/app/sales/list/")).await;
        assert_eq!(result.data().unwrap()["status"], "active");
    }

    #[tokio::test]
    async fn test_completed_slug() {
        let deps = deps().await;
        let ctx = ViewContext::get("/app/sales/list/completed").with_param("status", "completed");
        let data = list(&deps, &ctx).await.data().cloned().unwrap();
        let rows = data["table"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["cells"][4]["variant"], "success");
    }
}
