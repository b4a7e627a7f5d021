//! Drawer and row actions on products.

use super::PRODUCTS_TABLE;
use crate::domain::model::{collections, Record, RecordExt};
use crate::record;
use crate::routes;
use crate::view::labels::ProductFormLabels;
use crate::view::page::FormPage;
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::{bulk_delete, bulk_set_status as bulk_set_active, delete_one, set_status_one};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency: String,
    pub active: bool,
    pub labels: ProductFormLabels,
}

fn product_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    record! {
        "name" => form.get("name"),
        "description" => form.get("description"),
        "price" => form.number("price"),
        "currency" => form.get("currency"),
        "active" => form.checkbox("active"),
    }
}

pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    if ctx.is_get() {
        let form = ProductForm {
            currency: deps.settings.default_currency.clone(),
            active: true,
            labels: deps.labels.product.form.clone(),
            ..Default::default()
        };
        return ViewResult::ok("product-drawer-form", &FormPage::add(routes::PRODUCT_ADD, form));
    }

    if let Err(e) = deps.db.create(collections::PRODUCT, product_record(ctx)).await {
        tracing::error!("Failed to create product: {}", e);
        return htmx_error("Failed to create product");
    }
    htmx_success(PRODUCTS_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");

    if ctx.is_get() {
        let product = match deps.db.read(collections::PRODUCT, id).await {
            Ok(product) => product,
            Err(e) => {
                tracing::error!("Failed to read product {}: {}", id, e);
                return htmx_error("Product not found");
            }
        };
        let form = ProductForm {
            id: id.to_string(),
            name: product.text("name"),
            description: product.text("description"),
            price: format!("{:.2}", product.num("price")),
            currency: product.text("currency"),
            active: product.flag("active").unwrap_or(false),
            labels: deps.labels.product.form.clone(),
        };
        return ViewResult::ok(
            "product-drawer-form",
            &FormPage::edit(routes::url(routes::PRODUCT_EDIT, &[id]), form),
        );
    }

    if let Err(e) = deps.db.update(collections::PRODUCT, id, product_record(ctx)).await {
        tracing::error!("Failed to update product {}: {}", id, e);
        return htmx_error("Failed to update product");
    }
    htmx_success(PRODUCTS_TABLE)
}

pub async fn delete(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(deps.db.as_ref(), ctx, collections::PRODUCT, PRODUCTS_TABLE, "Product").await
}

pub async fn bulk_delete_products(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_delete(deps.db.as_ref(), ctx, collections::PRODUCT, PRODUCTS_TABLE, "product").await
}

/// `?id=…&status=active|inactive`; writes the `active` flag directly.
pub async fn set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    set_status_one(deps.db.as_ref(), ctx, collections::PRODUCT, PRODUCTS_TABLE, "Product").await
}

pub async fn bulk_set_status(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_set_active(deps.db.as_ref(), ctx, collections::PRODUCT, PRODUCTS_TABLE, "product").await
}
