//! Per-module view handlers. Each handler is a plain async function over
//! `&ViewDeps` and `&ViewContext` returning a `ViewResult`.

pub mod inventory;
pub mod paymentcollection;
pub mod plan;
pub mod pricelist;
pub mod product;
pub mod sales;
pub mod simple_list;
pub mod subscription;

use crate::domain::model::{collections, ActiveStatus, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::view::page::SelectOption;
use crate::view::table::TableCell;
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};

/// `"PHP 12.50"`, or just the amount when no currency is known.
pub(crate) fn money(currency: &str, amount: &str) -> String {
    if currency.is_empty() {
        amount.to_string()
    } else {
        format!("{} {}", currency, amount)
    }
}

pub(crate) fn active_badge(status: ActiveStatus) -> TableCell {
    let variant = if status.is_active() { "success" } else { "default" };
    TableCell::badge(status.as_str(), variant)
}

/// Active `location` records for drawer dropdowns.
pub(crate) async fn location_options(deps: &ViewDeps, current: &str) -> Vec<SelectOption> {
    let records = match deps.db.list_simple(collections::LOCATION).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list locations: {}", e);
            return Vec::new();
        }
    };

    records
        .iter()
        .filter(|r| r.flag("active") == Some(true) && !r.id().is_empty())
        .map(|r| {
            let label = match r.str_field("name") {
                "" => deps.location_name(r.id()).to_string(),
                name => name.to_string(),
            };
            SelectOption {
                selected: r.id() == current,
                value: r.id().to_string(),
                label,
            }
        })
        .collect()
}

/// Shared delete handler: id from `?id=` or the form.
pub(crate) async fn delete_one(
    db: &dyn DataSource,
    ctx: &ViewContext,
    collection: &str,
    table_id: &str,
    noun: &str,
) -> ViewResult {
    let id = ctx.query_or_form("id");
    if id.is_empty() {
        return htmx_error(&format!("{} ID is required", noun));
    }
    if let Err(e) = db.delete(collection, id).await {
        tracing::error!("Failed to delete {} {}: {}", collection, id, e);
        return htmx_error(&format!("Failed to delete {}", noun.to_lowercase()));
    }
    htmx_success(table_id)
}

/// Shared bulk delete: every `id` form value, failures logged and skipped.
pub(crate) async fn bulk_delete(
    db: &dyn DataSource,
    ctx: &ViewContext,
    collection: &str,
    table_id: &str,
    plural: &str,
) -> ViewResult {
    let ids = ctx.form.get_all("id");
    if ids.is_empty() {
        return htmx_error(&format!("No {} IDs provided", plural));
    }
    for id in ids {
        if let Err(e) = db.delete(collection, id).await {
            tracing::warn!("Failed to delete {} {}: {}", collection, id, e);
        }
    }
    htmx_success(table_id)
}

/// Shared active/inactive toggle used by inventory and products.
pub(crate) async fn set_active(
    db: &dyn DataSource,
    collection: &str,
    id: &str,
    status: ActiveStatus,
) -> crate::Result<Record> {
    db.update(
        collection,
        id,
        crate::record! { "active" => status.is_active() },
    )
    .await
}

pub(crate) async fn set_status_one(
    db: &dyn DataSource,
    ctx: &ViewContext,
    collection: &str,
    table_id: &str,
    noun: &str,
) -> ViewResult {
    let id = ctx.query_or_form("id");
    if id.is_empty() {
        return htmx_error(&format!("{} ID is required", noun));
    }
    let status: ActiveStatus = match ctx.query_or_form("status").parse() {
        Ok(status) => status,
        Err(_) => return htmx_error("Invalid status"),
    };
    if let Err(e) = set_active(db, collection, id, status).await {
        tracing::error!("Failed to set {} {} to {}: {}", collection, id, status, e);
        return htmx_error(&format!("Failed to update {} status", noun.to_lowercase()));
    }
    htmx_success(table_id)
}

pub(crate) async fn bulk_set_status(
    db: &dyn DataSource,
    ctx: &ViewContext,
    collection: &str,
    table_id: &str,
    plural: &str,
) -> ViewResult {
    let ids = ctx.form.get_all("id");
    if ids.is_empty() {
        return htmx_error(&format!("No {} IDs provided", plural));
    }
    let status: ActiveStatus = match ctx.form.get("target_status").parse() {
        Ok(status) => status,
        Err(_) => return htmx_error("Invalid target status"),
    };
    for id in ids {
        if let Err(e) = set_active(db, collection, id, status).await {
            tracing::warn!("Failed to set {} {} to {}: {}", collection, id, status, e);
        }
    }
    htmx_success(table_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    fn deps(db: Arc<InMemoryDataSource>) -> ViewDeps {
        ViewDeps::new(db, Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_location_options_only_active() {
        let db = Arc::new(InMemoryDataSource::new());
        db.create("location", record! { "id" => "sm-city-cebu", "active" => true })
            .await
            .unwrap();
        db.create("location", record! { "id" => "closed", "name" => "Closed", "active" => false })
            .await
            .unwrap();
        let options = location_options(&deps(db), "sm-city-cebu").await;
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "SM City Cebu");
        assert!(options[0].selected);
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_ids() {
        let db = InMemoryDataSource::new();
        let ctx = ViewContext::post("/action/x/bulk-delete");
        let result = bulk_delete(&db, &ctx, "plan", "plans-table", "plan").await;
        assert_eq!(result.header("HX-Error-Message"), Some("No plan IDs provided"));
    }

    #[tokio::test]
    async fn test_set_status_one_validates_status() {
        let db = InMemoryDataSource::new();
        db.create("product", record! { "id" => "p1", "active" => true }).await.unwrap();

        let bad = ViewContext::post("/x").with_query("id", "p1").with_query("status", "archived");
        let result = set_status_one(&db, &bad, "product", "products-table", "Product").await;
        assert_eq!(result.header("HX-Error-Message"), Some("Invalid status"));

        let good = ViewContext::post("/x").with_query("id", "p1").with_query("status", "inactive");
        let result = set_status_one(&db, &good, "product", "products-table", "Product").await;
        assert!(result.header("HX-Trigger").is_some());
        assert_eq!(db.read("product", "p1").await.unwrap().flag("active"), Some(false));
    }
}
