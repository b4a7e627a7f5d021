//! Drawer and row actions on sales.

use super::status::{bulk_set_sale_status, set_sale_status, StatusChangeError};
use super::SALES_TABLE;
use crate::domain::model::{collections, RecordExt, SaleStatus};
use crate::record;
use crate::routes;
use crate::view::labels::SalesFormLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::{htmx_error, htmx_redirect, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::{bulk_delete, delete_one, location_options};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleForm {
    pub id: String,
    pub name: String,
    pub reference_number: String,
    pub date: String,
    pub currency: String,
    pub status: String,
    pub notes: String,
    pub location_id: String,
    pub locations: Vec<SelectOption>,
    pub labels: SalesFormLabels,
}

fn sale_record(ctx: &ViewContext) -> crate::domain::model::Record {
    let form = &ctx.form;
    record! {
        "name" => form.get("name"),
        "reference_number" => form.get("reference_number"),
        "revenue_date_string" => form.get("revenue_date_string"),
        "currency" => form.get("currency"),
        "status" => form.get("status"),
        "notes" => form.get("notes"),
        "location_id" => form.get("location_id"),
    }
}

/// GET renders the drawer; POST creates the sale and opens its items tab.
pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    if ctx.is_get() {
        let form = SaleForm {
            currency: deps.settings.default_currency.clone(),
            status: SaleStatus::Ongoing.as_str().to_string(),
            locations: location_options(deps, "").await,
            labels: deps.labels.sales.form.clone(),
            ..Default::default()
        };
        return ViewResult::ok("sales-drawer-form", &FormPage::add(routes::SALES_ADD, form));
    }

    let mut data = sale_record(ctx);
    if ctx.form.get("status").is_empty() {
        data.insert("status".into(), SaleStatus::Ongoing.as_str().into());
    }
    data.insert("total_amount".into(), "0.00".into());

    let created = match deps.db.create(collections::REVENUE, data).await {
        Ok(created) => created,
        Err(e) => {
            tracing::error!("Failed to create sale: {}", e);
            return htmx_error("Failed to create sale");
        }
    };

    match created.id() {
        "" => htmx_success(SALES_TABLE),
        id => htmx_redirect(&routes::sales_detail_tab(id, "items")),
    }
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");

    if ctx.is_get() {
        let record = match deps.db.read(collections::REVENUE, id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to read sale {}: {}", id, e);
                return htmx_error("Sale not found");
            }
        };
        let location_id = record.text("location_id");
        let form = SaleForm {
            id: id.to_string(),
            name: record.text("name"),
            reference_number: record.text("reference_number"),
            date: record.text("revenue_date_string"),
            currency: record.text("currency"),
            status: record.text("status"),
            notes: record.text("notes"),
            locations: location_options(deps, &location_id).await,
            location_id,
            labels: deps.labels.sales.form.clone(),
        };
        return ViewResult::ok(
            "sales-drawer-form",
            &FormPage::edit(routes::url(routes::SALES_EDIT, &[id]), form),
        );
    }

    if let Err(e) = deps.db.update(collections::REVENUE, id, sale_record(ctx)).await {
        tracing::error!("Failed to update sale {}: {}", id, e);
        return htmx_error("Failed to update sale");
    }
    htmx_redirect(&routes::sales_detail(id))
}

pub async fn delete(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(deps.db.as_ref(), ctx, collections::REVENUE, SALES_TABLE, "Sale").await
}

pub async fn bulk_delete_sales(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_delete(deps.db.as_ref(), ctx, collections::REVENUE, SALES_TABLE, "sale").await
}

fn status_error(e: StatusChangeError) -> ViewResult {
    if let StatusChangeError::LineItemsUnavailable(source)
    | StatusChangeError::PaymentsUnavailable(source)
    | StatusChangeError::UpdateFailed(source) = &e
    {
        tracing::error!("{}: {}", e, source);
    }
    htmx_error(&e.to_string())
}

/// `?id=…&status=…`, falling back to form fields.
pub async fn set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.query_or_form("id");
    if id.is_empty() {
        return htmx_error("Sale ID is required");
    }
    let target: SaleStatus = match ctx.query_or_form("status").parse() {
        Ok(status) => status,
        Err(_) => return status_error(StatusChangeError::InvalidStatus),
    };

    match set_sale_status(deps.db.as_ref(), id, target).await {
        Ok(()) => htmx_success(SALES_TABLE),
        Err(e) => status_error(e),
    }
}

pub async fn bulk_set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let ids = ctx.form.get_all("id");
    if ids.is_empty() {
        return htmx_error("No sale IDs provided");
    }
    let target: SaleStatus = match ctx.form.get("target_status").parse() {
        Ok(status) => status,
        Err(_) => return status_error(StatusChangeError::InvalidTargetStatus),
    };

    match bulk_set_sale_status(deps.db.as_ref(), &ids, target).await {
        Ok(_) => htmx_success(SALES_TABLE),
        Err(e) => status_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::domain::ports::DataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    fn deps(db: Arc<InMemoryDataSource>) -> ViewDeps {
        ViewDeps::new(db, Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_add_redirects_to_items_tab() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/action/sales/add")
            .with_form("name", "Juan")
            .with_form("currency", "PHP");
        let result = add(&deps, &ctx).await;

        let sales = db.list_simple(collections::REVENUE).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].str_field("status"), "ongoing");
        assert_eq!(sales[0].str_field("total_amount"), "0.00");
        let expected = format!("/app/sales/detail/{}?tab=items", sales[0].id());
        assert_eq!(result.header("HX-Redirect"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_edit_redirects_to_detail() {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(collections::REVENUE, record! { "id" => "s1", "name" => "Old" })
            .await
            .unwrap();
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/x").with_param("id", "s1").with_form("name", "New");
        let result = edit(&deps, &ctx).await;
        assert_eq!(result.header("HX-Redirect"), Some("/app/sales/detail/s1"));
        assert_eq!(db.read(collections::REVENUE, "s1").await.unwrap().str_field("name"), "New");
    }

    #[tokio::test]
    async fn test_set_status_messages() {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(collections::REVENUE, record! { "id" => "s1", "status" => "ongoing" })
            .await
            .unwrap();
        let deps = deps(db);

        let no_id = set_status(&deps, &ViewContext::post("/x").with_query("status", "complete")).await;
        assert_eq!(no_id.header("HX-Error-Message"), Some("Sale ID is required"));

        let bad = ViewContext::post("/x").with_query("id", "s1").with_query("status", "done");
        assert_eq!(set_status(&deps, &bad).await.header("HX-Error-Message"), Some("Invalid status"));

        let empty = ViewContext::post("/x").with_query("id", "s1").with_query("status", "complete");
        assert_eq!(
            set_status(&deps, &empty).await.header("HX-Error-Message"),
            Some("Cannot complete a sale with no items. Add items first.")
        );
    }

    #[tokio::test]
    async fn test_bulk_set_status_validation() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db);

        let no_ids = ViewContext::post("/x").with_form("target_status", "complete");
        assert_eq!(
            bulk_set_status(&deps, &no_ids).await.header("HX-Error-Message"),
            Some("No sale IDs provided")
        );

        let bad = ViewContext::post("/x").with_form("id", "s1").with_form("target_status", "x");
        assert_eq!(
            bulk_set_status(&deps, &bad).await.header("HX-Error-Message"),
            Some("Invalid target status")
        );
    }

    #[tokio::test]
    async fn test_bulk_cancel_reports_paid_sales() {
        let db = Arc::new(InMemoryDataSource::new());
        for id in ["s1", "s2", "s3"] {
            db.create(collections::REVENUE, record! { "id" => id, "status" => "ongoing" })
                .await
                .unwrap();
        }
        db.create(collections::REVENUE_PAYMENT, record! { "revenue_id" => "s2" })
            .await
            .unwrap();
        let deps = deps(db);

        let ctx = ViewContext::post("/x")
            .with_form("id", "s1")
            .with_form("id", "s2")
            .with_form("id", "s3")
            .with_form("target_status", "cancelled");
        assert_eq!(
            bulk_set_status(&deps, &ctx).await.header("HX-Error-Message"),
            Some("1 of 3 selected sales have recorded payments. Remove payments first.")
        );
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let result = delete(&deps, &ViewContext::post("/x")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Sale ID is required"));
    }
}
