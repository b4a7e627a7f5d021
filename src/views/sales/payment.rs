//! Payments recorded against a sale.

use super::PAYMENT_TABLE;
use crate::domain::model::{collections, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::SalesPaymentLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::table::{TableAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::money;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub id: String,
    pub revenue_id: String,
    pub collection_method_id: String,
    pub amount_paid: String,
    pub currency: String,
    pub reference_number: String,
    pub notes: String,
    pub received_by: String,
    pub received_role: String,
    pub payment_methods: Vec<SelectOption>,
    pub labels: SalesPaymentLabels,
}

/// Collection methods as select options, labelled by name and falling back to the id.
pub async fn collection_method_options(db: &dyn DataSource, current: &str) -> Vec<SelectOption> {
    let methods = match db.list_simple(collections::COLLECTION_METHOD).await {
        Ok(methods) => methods,
        Err(e) => {
            tracing::error!("Failed to list collection methods: {}", e);
            return Vec::new();
        }
    };

    methods
        .iter()
        .map(|m| {
            let label = match m.str_field("name") {
                "" => m.id(),
                name => name,
            };
            SelectOption {
                value: m.id().to_string(),
                label: label.to_string(),
                selected: m.id() == current,
            }
        })
        .collect()
}

/// Name stored in `payment_method`; the id itself when the lookup fails.
async fn method_name(db: &dyn DataSource, method_id: &str) -> String {
    if method_id.is_empty() {
        return String::new();
    }
    match db.read(collections::COLLECTION_METHOD, method_id).await {
        Ok(method) if !method.str_field("name").is_empty() => method.text("name"),
        Ok(_) => method_id.to_string(),
        Err(e) => {
            tracing::debug!(method_id, "collection method lookup failed: {}", e);
            method_id.to_string()
        }
    }
}

pub fn build_payment_table(
    sale_id: &str,
    payments: &[Record],
    l: &SalesPaymentLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("method", &l.method).unsortable(),
        TableColumn::new("amount", &l.amount).width("140px").unsortable().right(),
        TableColumn::new("reference", &l.reference).width("160px").unsortable(),
        TableColumn::new("received_by", "Received By").width("160px").unsortable(),
    ];

    let rows = payments
        .iter()
        .map(|p| {
            let id = p.id();
            TableRow::new(
                id,
                vec![
                    TableCell::text(p.text("payment_method")),
                    TableCell::text(money(p.str_field("currency"), &p.text("amount_paid"))),
                    TableCell::text(p.text("reference_number")),
                    TableCell::text(p.text("received_by")),
                ],
            )
            .actions(vec![
                TableAction::edit(
                    &l.edit,
                    routes::url(routes::SALES_PAYMENT_EDIT, &[sale_id, id]),
                    &l.edit,
                ),
                TableAction::delete(
                    &l.remove,
                    routes::with_query(
                        routes::url(routes::SALES_PAYMENT_REMOVE, &[sale_id]),
                        "id",
                        id,
                    ),
                    p.str_field("reference_number"),
                ),
            ])
        })
        .collect();

    TableConfig::embedded(PAYMENT_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::SALES_PAYMENT_TABLE, &[sale_id]))
        .empty(&l.empty, "")
        .finish()
}

/// Renders the payments table fragment for HTMX refreshes.
pub async fn table(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");
    let payments = match super::status::payments_for(deps.db.as_ref(), sale_id).await {
        Ok(payments) => payments,
        Err(e) => {
            tracing::error!("Failed to list payments for revenue {}: {}", sale_id, e);
            Vec::new()
        }
    };
    let table = build_payment_table(
        sale_id,
        &payments,
        &deps.labels.sales.payment,
        deps.table_labels(),
    );
    ViewResult::ok("table-card", &table)
}

pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");

    if ctx.is_get() {
        let form = PaymentForm {
            revenue_id: sale_id.to_string(),
            currency: deps.settings.default_currency.clone(),
            payment_methods: collection_method_options(deps.db.as_ref(), "").await,
            labels: deps.labels.sales.payment.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "sales-payment-drawer-form",
            &FormPage::add(routes::url(routes::SALES_PAYMENT_ADD, &[sale_id]), form),
        );
    }

    let form = &ctx.form;
    let method_id = form.get("collection_method_id");
    let data = record! {
        "revenue_id" => sale_id,
        "payment_method" => method_name(deps.db.as_ref(), method_id).await,
        "amount_paid" => form.get("amount_paid"),
        "currency" => form.get("currency"),
        "collection_method_id" => method_id,
        "reference_number" => form.get("reference_number"),
        "received_by" => form.get("received_by"),
        "received_role" => form.get("received_role"),
        "collection_type" => "sale",
        "status" => "completed",
        "notes" => form.get("notes"),
    };

    if let Err(e) = deps.db.create(collections::REVENUE_PAYMENT, data).await {
        tracing::error!("Failed to create payment for revenue {}: {}", sale_id, e);
        return htmx_error("Failed to record payment");
    }
    htmx_success(PAYMENT_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let sale_id = ctx.param("id");
    let payment_id = ctx.param("pid");

    if ctx.is_get() {
        let record = match deps.db.read(collections::REVENUE_PAYMENT, payment_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to read payment {}: {}", payment_id, e);
                return htmx_error("Payment not found");
            }
        };
        let method_id = record.text("collection_method_id");
        let form = PaymentForm {
            id: payment_id.to_string(),
            revenue_id: sale_id.to_string(),
            payment_methods: collection_method_options(deps.db.as_ref(), &method_id).await,
            collection_method_id: method_id,
            amount_paid: record.text("amount_paid"),
            currency: record.text("currency"),
            reference_number: record.text("reference_number"),
            notes: record.text("notes"),
            received_by: record.text("received_by"),
            received_role: record.text("received_role"),
            labels: deps.labels.sales.payment.clone(),
        };
        return ViewResult::ok(
            "sales-payment-drawer-form",
            &FormPage::edit(
                routes::url(routes::SALES_PAYMENT_EDIT, &[sale_id, payment_id]),
                form,
            ),
        );
    }

    // received_by is fixed once recorded
    let form = &ctx.form;
    let method_id = form.get("collection_method_id");
    let data = record! {
        "payment_method" => method_name(deps.db.as_ref(), method_id).await,
        "amount_paid" => form.get("amount_paid"),
        "currency" => form.get("currency"),
        "collection_method_id" => method_id,
        "reference_number" => form.get("reference_number"),
        "received_role" => form.get("received_role"),
        "notes" => form.get("notes"),
    };

    if let Err(e) = deps.db.update(collections::REVENUE_PAYMENT, payment_id, data).await {
        tracing::error!("Failed to update payment {}: {}", payment_id, e);
        return htmx_error("Failed to update payment");
    }
    htmx_success(PAYMENT_TABLE)
}

pub async fn remove(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.query_or_form("id");
    if id.is_empty() {
        return htmx_error("Payment ID is required");
    }
    if let Err(e) = deps.db.delete(collections::REVENUE_PAYMENT, id).await {
        tracing::error!("Failed to delete payment {}: {}", id, e);
        return htmx_error("Failed to remove payment");
    }
    htmx_success(PAYMENT_TABLE)
}
