use super::{status_variant, VARIANTS_TABLE};
use crate::domain::model::{collections, ActiveStatus, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::{ProductLabels, ProductVariantLabels};
use crate::view::page::FormPage;
use crate::view::table::{PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::delete_one;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantForm {
    pub id: String,
    pub product_id: String,
    pub sku: String,
    pub price_override: String,
    pub active: bool,
    pub labels: ProductVariantLabels,
}

pub async fn variants_for(db: &dyn DataSource, product_id: &str) -> Vec<Record> {
    db.list_where(collections::PRODUCT_VARIANT, "product_id", product_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to list product variants: {}", e);
            Vec::new()
        })
}

pub fn build_variant_table(
    product_id: &str,
    variants: &[Record],
    l: &ProductLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("sku", &l.variant.sku),
        TableColumn::new("price_override", &l.variant.price_override).width("150px").right(),
        TableColumn::new("attributes", &l.variant.attributes).unsortable(),
        TableColumn::new("status", &l.columns.status).width("120px"),
    ];

    let rows = variants
        .iter()
        .map(|v| {
            let id = v.id();
            let sku = v.text("sku");
            // variants without an explicit flag are inactive
            let status = match v.flag("active") {
                Some(true) => ActiveStatus::Active,
                _ => ActiveStatus::Inactive,
            };
            TableRow::new(
                id,
                vec![
                    TableCell::text(sku.clone()),
                    TableCell::text(v.text("price_override")),
                    TableCell::text(v.text("attribute_values")),
                    TableCell::badge(status.as_str(), status_variant(status.as_str())),
                ],
            )
            .attr("sku", sku.clone())
            .attr("status", status.as_str())
            .actions(vec![
                TableAction::edit(
                    &l.variant.edit,
                    routes::url(routes::PRODUCT_VARIANT_EDIT, &[product_id, id]),
                    &l.variant.edit,
                ),
                TableAction::delete(
                    &l.variant.remove,
                    routes::with_query(routes::url(routes::PRODUCT_VARIANT_REMOVE, &[product_id]), "id", id),
                    &sku,
                ),
            ])
        })
        .collect();

    let mut table = TableConfig::embedded(VARIANTS_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::PRODUCT_VARIANT_TABLE, &[product_id]))
        .sorted_by("sku", "asc")
        .empty(&l.variant.empty, "No variants have been added to this product yet.")
        .primary(PrimaryAction::new(
            &l.variant.assign,
            &routes::url(routes::PRODUCT_VARIANT_ASSIGN, &[product_id]),
        ));
    table.show_search = true;
    table.show_sort = true;
    table.show_columns = true;
    table.show_density = true;
    table.show_entries = true;
    table.finish()
}

pub async fn table(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let product_id = ctx.param("id");
    let variants = variants_for(deps.db.as_ref(), product_id).await;
    let table = build_variant_table(product_id, &variants, &deps.labels.product, deps.table_labels());
    ViewResult::ok("table-card", &table)
}

fn variant_record(ctx: &ViewContext) -> Record {
    let form = &ctx.form;
    record! {
        "sku" => form.get("sku"),
        "price_override" => form.get("price_override"),
        "active" => form.checkbox("active"),
    }
}

pub async fn assign(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let product_id = ctx.param("id");

    if ctx.is_get() {
        let form = VariantForm {
            product_id: product_id.to_string(),
            active: true,
            labels: deps.labels.product.variant.clone(),
            ..Default::default()
        };
        return ViewResult::ok(
            "variant-drawer-form",
            &FormPage::add(routes::url(routes::PRODUCT_VARIANT_ASSIGN, &[product_id]), form),
        );
    }

    let mut data = variant_record(ctx);
    data.insert("product_id".into(), product_id.into());
    if let Err(e) = deps.db.create(collections::PRODUCT_VARIANT, data).await {
        tracing::error!("Failed to create product variant: {}", e);
        return htmx_error("Failed to create variant");
    }
    htmx_success(VARIANTS_TABLE)
}

pub async fn edit(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let product_id = ctx.param("id");
    let variant_id = ctx.param("vid");

    if ctx.is_get() {
        let variant = match deps.db.read(collections::PRODUCT_VARIANT, variant_id).await {
            Ok(variant) => variant,
            Err(e) => {
                tracing::error!("Failed to read product variant {}: {}", variant_id, e);
                return htmx_error("Variant not found");
            }
        };
        let form = VariantForm {
            id: variant_id.to_string(),
            product_id: product_id.to_string(),
            sku: variant.text("sku"),
            price_override: variant.text("price_override"),
            active: variant.flag("active").unwrap_or(false),
            labels: deps.labels.product.variant.clone(),
        };
        return ViewResult::ok(
            "variant-drawer-form",
            &FormPage::edit(routes::url(routes::PRODUCT_VARIANT_EDIT, &[product_id, variant_id]), form),
        );
    }

    if let Err(e) = deps
        .db
        .update(collections::PRODUCT_VARIANT, variant_id, variant_record(ctx))
        .await
    {
        tracing::error!("Failed to update product variant {}: {}", variant_id, e);
        return htmx_error("Failed to update variant");
    }
    htmx_success(VARIANTS_TABLE)
}

pub async fn remove(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(deps.db.as_ref(), ctx, collections::PRODUCT_VARIANT, VARIANTS_TABLE, "Variant").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    fn deps(db: Arc<InMemoryDataSource>) -> ViewDeps {
        ViewDeps::new(db, Arc::new(Labels::default()), ViewSettings::default())
    }

    #[tokio::test]
    async fn test_assign_scopes_to_product() {
        let db = Arc::new(InMemoryDataSource::new());
        let deps = deps(db.clone());
        let ctx = ViewContext::post("/x")
            .with_param("id", "p1")
            .with_form("sku", "MUG-RED")
            .with_form("price_override", "220")
            .with_form("active", "true");
        let result = assign(&deps, &ctx).await;
        assert!(result.header("HX-Trigger").unwrap().contains(VARIANTS_TABLE));
        db.create(collections::PRODUCT_VARIANT, record! { "product_id" => "p2", "sku" => "OTHER" })
            .await
            .unwrap();

        let result = table(&deps, &ViewContext::get("/x").with_param("id", "p1")).await;
        assert_eq!(result.template(), Some("table-card"));
        let rows = result.data().unwrap()["rows"].as_array().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["cells"][0]["value"], "MUG-RED");
        assert_eq!(rows[0]["cells"][3]["value"], "active");
    }

    #[tokio::test]
    async fn test_edit_and_remove_errors() {
        let deps = deps(Arc::new(InMemoryDataSource::new()));
        let ctx = ViewContext::get("/x").with_param("id", "p1").with_param("vid", "v9");
        assert_eq!(edit(&deps, &ctx).await.header("HX-Error-Message"), Some("Variant not found"));
        let result = remove(&deps, &ViewContext::post("/x").with_param("id", "p1")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Variant ID is required"));
    }
}
