//! Payment collections awaiting, completed or failed.

use super::simple_list::{ListColumn, SimpleList};
use crate::domain::model::collections;
use crate::view::{ViewContext, ViewDeps, ViewResult};

pub const PAYMENT_COLLECTIONS_TABLE: &str = "payment-collections-table";

fn heading(status: &str) -> &'static str {
    match status {
        "pending" => "Pending Payments",
        "completed" => "Completed Payments",
        "failed" => "Failed Payments",
        _ => "Payment Collections",
    }
}

fn caption(status: &str) -> &'static str {
    match status {
        "pending" => "Payments awaiting collection",
        "completed" => "Successfully collected payments",
        "failed" => "Failed payment attempts",
        _ => "Payment collection management",
    }
}

fn status_variant(status: &str) -> &'static str {
    match status {
        "pending" => "warning",
        "completed" => "success",
        "failed" => "danger",
        _ => "default",
    }
}

const PAYMENT_COLLECTIONS: SimpleList = SimpleList {
    collection: collections::PAYMENT_COLLECTION,
    table_id: PAYMENT_COLLECTIONS_TABLE,
    template: "paymentcollection-list",
    content_template: "paymentcollection-list-content",
    nav: "payment-collections",
    icon: "icon-credit-card",
    plural: "payment collections",
    default_status: "pending",
    columns: &[
        ListColumn::text("customer", "Customer"),
        ListColumn::sized("amount", "Amount", "120px"),
        ListColumn::sized("date", "Date", "150px"),
    ],
    heading,
    caption,
    status_variant,
};

/// `/app/payment-collections/list/:status`
pub async fn list(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    PAYMENT_COLLECTIONS.render(deps, ctx).await
}
