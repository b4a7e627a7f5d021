//! Product detail page with info, variants, attributes and pricing tabs.

use super::attribute::{attributes_for, build_attribute_table};
use super::variant::{build_variant_table, variants_for};
use super::{format_price, product_status, status_variant, PRICING_TABLE};
use crate::domain::model::{collections, Record, RecordExt};
use crate::domain::pricing::{list_price_lists, list_price_products, PriceList, Validity};
use crate::routes;
use crate::view::labels::ProductLabels;
use crate::view::page::{activate_tab, PageMeta, TabItem};
use crate::view::table::{TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{ViewContext, ViewDeps, ViewResult};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub product: Value,
    pub labels: ProductLabels,
    pub active_tab: String,
    pub product_name: String,
    pub product_desc: String,
    pub product_price: String,
    pub product_currency: String,
    pub product_status: String,
    pub status_variant: String,
    pub collections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_table: Option<TableConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_table: Option<TableConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub content_template: &'static str,
    pub tab_items: Vec<TabItem>,
    #[serde(flatten)]
    pub view: ProductView,
}

fn tab_items(l: &ProductLabels, id: &str, variants: usize, attributes: usize) -> Vec<TabItem> {
    let tab = |key: &str, label: &str, icon: &str| {
        TabItem::new(key, label, routes::product_detail_tab(id, key), icon)
    };
    vec![
        tab("info", &l.tabs.info, "icon-info"),
        tab("variants", &l.tabs.variants, "icon-layers").count(variants),
        tab("attributes", &l.tabs.attributes, "icon-sliders").count(attributes),
        tab("pricing", &l.tabs.pricing, "icon-tag"),
    ]
}

fn validity_label(validity: Validity, l: &ProductLabels) -> &str {
    match validity {
        Validity::Effective => &l.pricing.effective,
        Validity::Scheduled => &l.pricing.scheduled,
        Validity::Expired => &l.pricing.expired,
    }
}

fn validity_variant(validity: Validity) -> &'static str {
    match validity {
        Validity::Effective => "success",
        Validity::Scheduled => "info",
        Validity::Expired => "default",
    }
}

/// Price products of `product_id`, each joined with its price list and badged
/// by where `today` falls in the list's window.
pub async fn build_pricing_table(
    deps: &ViewDeps,
    product_id: &str,
    today: NaiveDate,
    labels: TableLabels,
) -> TableConfig {
    let l = &deps.labels.product;
    let db = deps.db.as_ref();
    let lists: HashMap<String, PriceList> = match list_price_lists(db).await {
        Ok(lists) => lists.into_iter().map(|pl| (pl.id.clone(), pl)).collect(),
        Err(e) => {
            tracing::warn!("pricing tab without price list names: {}", e);
            HashMap::new()
        }
    };

    let columns = vec![
        TableColumn::new("price_list", &l.pricing.price_list),
        TableColumn::new("amount", &l.pricing.amount).width("150px").right(),
        TableColumn::new("valid_from", &l.pricing.valid_from).width("140px"),
        TableColumn::new("valid_to", &l.pricing.valid_to).width("140px"),
        TableColumn::new("validity", &l.pricing.validity).width("120px"),
    ];

    let rows = list_price_products(db)
        .await
        .into_iter()
        .filter(|pp| pp.product_id == product_id)
        .map(|pp| {
            let list_id = pp.price_list_id.clone().unwrap_or_default();
            let list = lists.get(&list_id);
            let list_name = match list {
                Some(list) if !list.name.is_empty() => list.name.clone(),
                _ => list_id.clone(),
            };
            let valid_from = list.map(|pl| pl.date_start_string.clone()).unwrap_or_default();
            let valid_to = list
                .and_then(|pl| pl.date_end_string.clone())
                .unwrap_or_default();
            let validity = list.map(|pl| pl.validity_on(today)).unwrap_or(Validity::Effective);
            let amount = crate::views::money(&pp.currency, &pp.amount.to_string());

            let mut row = TableRow::new(
                pp.id.clone(),
                vec![
                    TableCell::text(list_name.clone()),
                    TableCell::text(amount),
                    TableCell::date(valid_from.clone()),
                    TableCell::date(valid_to.clone()),
                    TableCell::badge(validity_label(validity, l), validity_variant(validity)),
                ],
            )
            .attr("price_list", list_name)
            .attr("amount", pp.amount.to_string())
            .attr("valid_from", valid_from)
            .attr("valid_to", valid_to)
            .attr("validity", validity.as_str());
            if !list_id.is_empty() {
                row = row.href(routes::price_list_detail_tab(&list_id, "prices"));
            }
            row
        })
        .collect();

    let mut table = TableConfig::embedded(PRICING_TABLE, columns, rows, labels)
        .sorted_by("price_list", "asc")
        .empty(&l.pricing.empty, "This product has not been added to any price lists yet.");
    table.show_actions = false;
    table.show_search = true;
    table.show_sort = true;
    table.show_entries = true;
    table.finish()
}

async fn product_view(deps: &ViewDeps, product: Record, tab: &str) -> ProductView {
    let l = &deps.labels.product;
    let id = product.id().to_string();
    let currency = match product.str_field("currency") {
        "" => "PHP".to_string(),
        currency => currency.to_string(),
    };
    let status = match product_status(&product) {
        "inactive" => "inactive",
        _ => "active",
    };
    let collections = product
        .get("product_collections")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.get("collection_id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut view = ProductView {
        id: id.clone(),
        labels: l.clone(),
        active_tab: tab.to_string(),
        product_name: product.text("name"),
        product_desc: product.text("description"),
        product_price: format_price(&currency, product.num("price")),
        product_currency: currency,
        product_status: status.to_string(),
        status_variant: status_variant(status).to_string(),
        collections,
        ..Default::default()
    };

    let db = deps.db.as_ref();
    match tab {
        "variants" => {
            let variants = variants_for(db, &id).await;
            view.variants_table = Some(build_variant_table(&id, &variants, l, deps.table_labels()));
        }
        "attributes" => {
            let attributes = attributes_for(db, &id).await;
            view.attributes_table = Some(build_attribute_table(&id, &attributes, l, deps.table_labels()));
        }
        "pricing" => {
            let today = chrono::Local::now().date_naive();
            view.pricing_table = Some(build_pricing_table(deps, &id, today, deps.table_labels()).await);
        }
        _ => {}
    }

    view.product = Value::Object(product);
    view
}

async fn read_product(deps: &ViewDeps, id: &str) -> Result<Record, ViewResult> {
    deps.db.read(collections::PRODUCT, id).await.map_err(|e| {
        tracing::error!("Failed to read product {}: {}", id, e);
        ViewResult::error(e)
    })
}

/// `/app/products/detail/:id?tab=…`
pub async fn page(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let product = match read_product(deps, id).await {
        Ok(product) => product,
        Err(result) => return result,
    };

    let db = deps.db.as_ref();
    let variant_count = variants_for(db, id).await.len();
    let attribute_count = attributes_for(db, id).await.len();
    let l = &deps.labels.product;
    let (tabs, active_tab) = activate_tab(
        tab_items(l, id, variant_count, attribute_count),
        ctx.query_param("tab"),
    );

    let name = product.text("name");
    let page = ProductDetailPage {
        meta: PageMeta::new(ctx, &deps.labels.common, name)
            .nav("products", "")
            .header(product.text("description"), "icon-package"),
        content_template: "product-detail-content",
        tab_items: tabs,
        view: product_view(deps, product, &active_tab).await,
    };
    ViewResult::ok("product-detail", &page)
}

/// Tab partial rendered with `product-tab-{tab}`.
pub async fn tab(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let id = ctx.param("id");
    let tab = match ctx.param("tab") {
        "" => "info",
        tab => tab,
    };
    let product = match read_product(deps, id).await {
        Ok(product) => product,
        Err(result) => return result,
    };
    let view = product_view(deps, product, tab).await;
    ViewResult::ok(&format!("product-tab-{}", tab), &view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::domain::ports::DataSource;
    use crate::record;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn setup() -> (Arc<InMemoryDataSource>, ViewDeps) {
        let db = Arc::new(InMemoryDataSource::new());
        db.create(
            collections::PRODUCT,
            record! {
                "id" => "p1",
                "name" => "Ceramic Mug",
                "description" => "Stoneware",
                "price" => 1234.5,
                "active" => true,
            },
        )
        .await
        .unwrap();
        for sku in ["MUG-R", "MUG-B"] {
            db.create(collections::PRODUCT_VARIANT, record! { "product_id" => "p1", "sku" => sku })
                .await
                .unwrap();
        }
        db.create(collections::PRODUCT_ATTRIBUTE, record! { "product_id" => "p1", "attribute_id" => "a1" })
            .await
            .unwrap();
        let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
        (db, deps)
    }

    #[tokio::test]
    async fn test_page_header_price_and_counts() {
        let (_db, deps) = setup().await;
        let result = page(&deps, &ViewContext::get("/x").with_param("id", "p1")).await;
        assert_eq!(result.template(), Some("product-detail"));
        let data = result.data().unwrap();
        assert_eq!(data["title"], "Ceramic Mug");
        assert_eq!(data["headerSubtitle"], "Stoneware");
        assert_eq!(data["productPrice"], "PHP 1,234.50");
        assert_eq!(data["statusVariant"], "success");
        assert_eq!(data["tabItems"][1]["count"], 2);
        assert_eq!(data["tabItems"][2]["count"], 1);
        assert!(data["tabItems"][0].get("count").is_none());
    }

    #[tokio::test]
    async fn test_variants_tab_partial() {
        let (_db, deps) = setup().await;
        let ctx = ViewContext::get("/x").with_param("id", "p1").with_param("tab", "variants");
        let result = tab(&deps, &ctx).await;
        assert_eq!(result.template(), Some("product-tab-variants"));
        let data = result.data().unwrap();
        assert_eq!(data["variantsTable"]["rows"].as_array().unwrap().len(), 2);
        assert!(data.get("pricingTable").is_none());
    }

    #[tokio::test]
    async fn test_pricing_validity_badges() {
        let (db, deps) = setup().await;
        let lists = [
            ("pl-now", "Regular", "2026-01-01", ""),
            ("pl-soon", "Holiday", "2026-12-01", "2026-12-31"),
            ("pl-old", "Summer", "2026-03-01", "2026-05-31"),
        ];
        for (id, name, start, end) in lists {
            let mut rec = record! { "id" => id, "name" => name, "date_start_string" => start };
            if !end.is_empty() {
                rec.insert("date_end_string".into(), end.into());
            }
            db.create(collections::PRICE_LIST, rec).await.unwrap();
            db.create(
                collections::PRICE_PRODUCT,
                record! { "product_id" => "p1", "price_list_id" => id, "amount" => 100, "currency" => "PHP" },
            )
            .await
            .unwrap();
        }

        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let table = build_pricing_table(&deps, "p1", today, TableLabels::default()).await;
        let badges: Vec<(&str, &str)> = table
            .rows
            .iter()
            .map(|r| (r.cells[0].value.as_str(), r.cells[4].value.as_str()))
            .collect();
        assert_eq!(
            badges,
            [("Holiday", "Scheduled"), ("Regular", "Effective"), ("Summer", "Expired")]
        );
        assert_eq!(table.rows[1].cells[1].value, "PHP 100");
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (_db, deps) = setup().await;
        let result = page(&deps, &ViewContext::get("/x").with_param("id", "nope")).await;
        assert_eq!(result.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
