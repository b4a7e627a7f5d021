use super::line_items::build_line_item_table;
use super::payment::build_payment_table;
use super::status::{line_items_for, payments_for};
use crate::domain::model::{collections, Record, RecordExt};
use crate::routes;
use crate::view::labels::SalesLabels;
use crate::view::page::{activate_tab, PageMeta, TabItem};
use crate::view::table::{TableColumn, TableConfig, TableLabels};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use crate::views::money;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: String,
    pub amount_paid: String,
    pub currency: String,
    pub card_last4: String,
    pub payment_date: String,
    pub received_by: String,
    pub received_role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDetailPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub revenue: Value,
    pub labels: SalesLabels,
    pub active_tab: String,
    pub tab_items: Vec<TabItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_item_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_table: Option<TableConfig>,
}

fn tab_items(l: &SalesLabels, id: &str) -> Vec<TabItem> {
    vec![
        TabItem::new("info", &l.detail.tab_basic_info, routes::sales_detail_tab(id, "info"), "icon-info"),
        TabItem::new("items", &l.detail.tab_line_items, routes::sales_detail_tab(id, "items"), "icon-list"),
        TabItem::new("payment", &l.detail.tab_payment, routes::sales_detail_tab(id, "payment"), "icon-credit-card"),
        TabItem::new("audit", &l.detail.tab_audit_trail, routes::sales_detail_tab(id, "audit"), "icon-clock"),
    ]
}

/// First payment of the sale, or the sale's own total when none is recorded.
pub fn payment_info(payments: &[Record], sale: &Record) -> PaymentInfo {
    let currency = sale.text("currency");
    match payments.first() {
        Some(p) => PaymentInfo {
            method: p.text("payment_method"),
            amount_paid: money(&currency, &p.text("amount_paid")),
            card_last4: p.text("card_last4"),
            payment_date: p.text("payment_date"),
            received_by: p.text("received_by"),
            received_role: p.text("received_role"),
            currency,
        },
        None => PaymentInfo {
            method: "—".to_string(),
            amount_paid: money(&currency, &sale.text("total_amount")),
            currency,
            ..Default::default()
        },
    }
}

pub fn build_audit_table(l: &SalesLabels, labels: TableLabels) -> TableConfig {
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

/// `/app/sales/detail/:id?tab=…`. Tab data failures degrade to empty tables.
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let sale = match deps.db.read(collections::REVENUE, id).await {
        Ok(sale) => sale,
        Err(e) => {
            tracing::error!("Failed to read revenue {}: {}", id, e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.sales;
    let title = format!("Sale #{}", sale.str_field("reference_number"));
    let (tabs, active_tab) = activate_tab(tab_items(l, id), ctx.query_param("tab"));

    let mut page = SalesDetailPage {
        meta: PageMeta::new(ctx, &deps.labels.common, title)
            .nav("sales", "")
            .header(&l.detail.page_title, "icon-shopping-bag"),
        content_template: "sales-detail-content",
        revenue: Value::Object(sale.clone()),
        labels: l.clone(),
        active_tab,
        tab_items: tabs,
        line_item_table: None,
        total_amount: None,
        payment: None,
        payment_table: None,
        audit_table: None,
    };

    let db = deps.db.as_ref();
    match page.active_tab.as_str() {
        "items" => {
            let items = line_items_for(db, id).await.unwrap_or_else(|e| {
                tracing::error!("Failed to list line items for revenue {}: {}", id, e);
                Vec::new()
            });
            let currency = sale.str_field("currency");
            page.line_item_table = Some(build_line_item_table(
                id,
                &items,
                currency,
                &l.line_item,
                deps.table_labels(),
            ));
            page.total_amount = Some(money(currency, &sale.text("total_amount")));
        }
        "payment" => {
            let payments = payments_for(db, id).await.unwrap_or_else(|e| {
                tracing::error!("Failed to list payments for revenue {}: {}", id, e);
                Vec::new()
            });
            page.payment = Some(payment_info(&payments, &sale));
            page.payment_table = Some(build_payment_table(
                id,
                &payments,
                &l.payment,
                deps.table_labels(),
            ));
        }
        "audit" => page.audit_table = Some(build_audit_table(l, deps.table_labels())),
        _ => {}
    }

    ViewResult::ok("sales-detail", &page)
}
