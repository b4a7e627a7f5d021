use super::PRICE_PRODUCTS_TABLE;
use crate::domain::model::{collections, RecordExt};
use crate::domain::pricing::{create_price_product, delete_price_product, PriceProduct};
use crate::routes;
use crate::view::labels::PriceListFormLabels;
use crate::view::page::{FormPage, SelectOption};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceProductForm {
    pub price_list_id: String,
    pub currency: String,
    pub products: Vec<SelectOption>,
    pub labels: PriceListFormLabels,
}

/// Active products offered in the add-price drawer.
async fn product_options(deps: &ViewDeps) -> Vec<SelectOption> {
    match deps.db.list_simple(collections::PRODUCT).await {
        Ok(products) => products
            .iter()
            .filter(|p| p.flag("active") == Some(true))
            .map(|p| SelectOption::new(p.text("id"), p.text("name")))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to list products for price product form: {}", e);
            Vec::new()
        }
    }
}

/// `/action/price-lists/:id/products/add`
pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let price_list_id = ctx.param("id");

    if ctx.is_get() {
        let form = PriceProductForm {
            price_list_id: price_list_id.to_string(),
            currency: deps.settings.default_currency.clone(),
            products: product_options(deps).await,
            labels: deps.labels.pricelist.form.clone(),
        };
        return ViewResult::ok(
            "price-product-drawer-form",
            &FormPage::add(routes::url(routes::PRICE_PRODUCT_ADD, &[price_list_id]), form),
        );
    }

    let form = &ctx.form;
    let product_id = form.get("product_id");
    if product_id.is_empty() {
        return htmx_error("Product is required");
    }

    let amount = match form.get("amount").trim() {
        "" => 0,
        raw => match raw.parse::<i64>() {
            Ok(amount) => amount,
            Err(_) => return htmx_error("Amount must be a valid number"),
        },
    };

    let price = PriceProduct {
        product_id: product_id.to_string(),
        name: form.get("name").to_string(),
        currency: form.get("currency").to_string(),
        amount,
        price_list_id: Some(price_list_id.to_string()),
        active: true,
        ..Default::default()
    };
    if let Err(e) = create_price_product(deps.db.as_ref(), &price).await {
        tracing::error!("Failed to create price product: {}", e);
        return htmx_error("Failed to add product price");
    }
    htmx_success(PRICE_PRODUCTS_TABLE)
}

pub async fn delete(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.query_or_form("id");
    if id.is_empty() {
        return htmx_error("Price product ID is required");
    }
    if let Err(e) = delete_price_product(deps.db.as_ref(), id).await {
        tracing::error!("Failed to delete price product {}: {}", id, e);
        return htmx_error("Failed to remove product price");
    }
    htmx_success(PRICE_PRODUCTS_TABLE)
}
