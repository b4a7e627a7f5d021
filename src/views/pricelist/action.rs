use super::PRICE_LISTS_TABLE;
use crate::domain::pricing::{create_price_list, read_price_list, update_price_list, PriceList};
use crate::domain::model::collections;
use crate::routes;
use crate::view::labels::PriceListFormLabels;
use crate::view::page::FormPage;
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::{bulk_delete, delete_one};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date_start: String,
    pub date_end: String,
    pub active: bool,
    pub labels: PriceListFormLabels,
}

/// An empty end date leaves the list open-ended.
fn price_list_from_form(id: &str, ctx: &ViewContext) -> PriceList {
    let form = &ctx.form;
    let date_end = form.get("date_end");
    PriceList {
        id: id.to_string(),
        name: form.get("name").to_string(),
        description: Some(form.get("description").to_string()),
        date_start_string: form.get("date_start").to_string(),
        date_end_string: (!date_end.is_empty()).then(|| date_end.to_string()),
        active: form.checkbox("active"),
    }
}

pub async fn add(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    if ctx.is_get() {
        let form = PriceListForm {
            active: true,
            labels: deps.labels.pricelist.form.clone(),
            ..Default::default()
        };
        return ViewResult::ok("pricelist-drawer-form", &FormPage::add(routes::PRICE_LIST_ADD, form));
    }

    if let Err(e) = create_price_list(deps.db.as_ref(), &price_list_from_form("", ctx)).await {
        tracing::error!("Failed to create price list: {}", e);
        return htmx_error("Failed to create price list");
    }
    htmx_success(PRICE_LISTS_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");

    if ctx.is_get() {
        let price_list = match read_price_list(deps.db.as_ref(), id).await {
            Ok(price_list) => price_list,
            Err(e) => {
                tracing::error!("Failed to read price list {}: {}", id, e);
                return htmx_error("Price list not found");
            }
        };
        let form = PriceListForm {
            id: id.to_string(),
            name: price_list.name,
            description: price_list.description.unwrap_or_default(),
            date_start: price_list.date_start_string,
            date_end: price_list.date_end_string.unwrap_or_default(),
            active: price_list.active,
            labels: deps.labels.pricelist.form.clone(),
        };
        return ViewResult::ok(
            "pricelist-drawer-form",
            &FormPage::edit(routes::url(routes::PRICE_LIST_EDIT, &[id]), form),
        );
    }

    if let Err(e) = update_price_list(deps.db.as_ref(), &price_list_from_form(id, ctx)).await {
        tracing::error!("Failed to update price list {}: {}", id, e);
        return htmx_error("Failed to update price list");
    }
    htmx_success(PRICE_LISTS_TABLE)
}

pub async fn delete(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(deps.db.as_ref(), ctx, collections::PRICE_LIST, PRICE_LISTS_TABLE, "Price list").await
}

pub async fn bulk_delete_price_lists(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    bulk_delete(deps.db.as_ref(), ctx, collections::PRICE_LIST, PRICE_LISTS_TABLE, "price list").await
}
