//! Price list detail with basic info and prices tabs.

use super::PRICE_PRODUCTS_TABLE;
use crate::domain::model::{collections, RecordExt};
use crate::domain::pricing::{list_price_products, read_price_list, PriceList, PriceProduct};
use crate::routes;
use crate::view::labels::PriceListLabels;
use crate::view::page::{activate_tab, PageMeta, TabItem};
use crate::view::table::{PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListDetailPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub price_list: PriceList,
    pub active_tab: String,
    pub tab_items: Vec<TabItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices_table: Option<TableConfig>,
    pub labels: PriceListLabels,
}

fn tab_items(l: &PriceListLabels, id: &str) -> Vec<TabItem> {
    vec![
        TabItem::new("basic", &l.detail.basic_info, routes::price_list_detail_tab(id, "basic"), "icon-info"),
        TabItem::new("prices", &l.detail.prices, routes::price_list_detail_tab(id, "prices"), "icon-dollar-sign"),
    ]
}

/// Prices on `price_list_id`. A row without its own name shows the product's.
pub async fn build_prices_table(deps: &ViewDeps, price_list_id: &str) -> TableConfig {
    let l = &deps.labels.pricelist;
    let prices: Vec<PriceProduct> = list_price_products(deps.db.as_ref())
        .await
        .into_iter()
        .filter(|pp| pp.price_list_id.as_deref() == Some(price_list_id))
        .collect();

    let product_names: HashMap<String, String> = if prices.iter().any(|pp| pp.name.is_empty()) {
        match deps.db.list_simple(collections::PRODUCT).await {
            Ok(products) => products.iter().map(|p| (p.text("id"), p.text("name"))).collect(),
            Err(e) => {
                tracing::warn!("prices table without product names: {}", e);
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    let columns = vec![
        TableColumn::new("product_name", &l.detail.product_name),
        TableColumn::new("amount", &l.detail.amount).width("150px").right(),
        TableColumn::new("currency", &l.detail.currency).width("120px"),
    ];

    let rows = prices
        .iter()
        .map(|pp| {
            let name = match pp.name.as_str() {
                "" => product_names
                    .get(&pp.product_id)
                    .cloned()
                    .unwrap_or_else(|| pp.product_id.clone()),
                name => name.to_string(),
            };
            TableRow::new(
                pp.id.clone(),
                vec![
                    TableCell::text(name.clone()),
                    TableCell::text(pp.amount.to_string()),
                    TableCell::text(pp.currency.clone()),
                ],
            )
            .attr("product_name", name.clone())
            .attr("amount", pp.amount.to_string())
            .attr("currency", pp.currency.clone())
            .actions(vec![TableAction::delete(
                &l.actions.delete,
                routes::with_query(routes::url(routes::PRICE_PRODUCT_DELETE, &[price_list_id]), "id", &pp.id),
                &name,
            )])
        })
        .collect();

    let mut table = TableConfig::embedded(PRICE_PRODUCTS_TABLE, columns, rows, deps.table_labels())
        .sorted_by("product_name", "asc")
        .empty(&l.detail.empty, "Add products to this price list to configure pricing.")
        .primary(PrimaryAction::new(
            &l.buttons.add_price,
            &routes::url(routes::PRICE_PRODUCT_ADD, &[price_list_id]),
        ));
    table.show_search = true;
    table.finish()
}

/// `/app/price-lists/detail/:id?tab=basic|prices`
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let price_list = match read_price_list(deps.db.as_ref(), id).await {
        Ok(price_list) => price_list,
        Err(e) => {
            tracing::error!("Failed to read price list {}: {}", id, e);
            return ViewResult::error(e);
        }
    };

    let l = &deps.labels.pricelist;
    let (tabs, active_tab) = activate_tab(tab_items(l, id), ctx.query_param("tab"));
    let prices_table = if active_tab == "prices" {
        Some(build_prices_table(deps, id).await)
    } else {
        None
    };

    let page = PriceListDetailPage {
        meta: PageMeta::new(ctx, &deps.labels.common, price_list.name.clone())
            .nav("price-lists", "")
            .header(price_list.description.clone().unwrap_or_default(), "icon-tag"),
        content_template: "pricelist-detail-content",
        price_list,
        active_tab,
        tab_items: tabs,
        prices_table,
        labels: l.clone(),
    };
    ViewResult::ok("pricelist-detail", &page)
}
