use super::ATTRIBUTES_TABLE;
use crate::domain::model::{collections, Record, RecordExt};
use crate::domain::ports::DataSource;
use crate::record;
use crate::routes;
use crate::view::labels::{ProductAttributeLabels, ProductLabels};
use crate::view::page::FormPage;
use crate::view::table::{PrimaryAction, TableAction, TableCell, TableColumn, TableConfig, TableLabels, TableRow};
use crate::view::{htmx_error, htmx_success, ViewContext, ViewDeps, ViewResult};
use crate::views::delete_one;
use serde::Serialize;
use std::collections::HashSet;

/// A global attribute not yet assigned to the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableAttribute {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeForm {
    pub product_id: String,
    pub available_attributes: Vec<AvailableAttribute>,
    pub labels: ProductAttributeLabels,
}

pub async fn attributes_for(db: &dyn DataSource, product_id: &str) -> Vec<Record> {
    db.list_where(collections::PRODUCT_ATTRIBUTE, "product_id", product_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to list product attributes: {}", e);
            Vec::new()
        })
}

pub fn build_attribute_table(
    product_id: &str,
    attributes: &[Record],
    l: &ProductLabels,
    labels: TableLabels,
) -> TableConfig {
    let columns = vec![
        TableColumn::new("name", &l.attribute.name),
        TableColumn::new("code", &l.attribute.code),
        TableColumn::new("data_type", "Data Type").width("120px"),
        TableColumn::new("default_value", &l.attribute.default_value).width("150px").unsortable(),
    ];

    let rows = attributes
        .iter()
        .map(|a| {
            let id = a.id();
            let name = a.text("attribute_name");
            let code = a.text("attribute_code");
            TableRow::new(
                id,
                vec![
                    TableCell::text(name.clone()),
                    TableCell::text(code.clone()),
                    TableCell::badge(a.text("data_type"), "info"),
                    TableCell::text(a.text("default_value")),
                ],
            )
            .attr("name", name.clone())
            .attr("code", code)
            .actions(vec![TableAction::delete(
                &l.attribute.remove,
                routes::with_query(routes::url(routes::PRODUCT_ATTRIBUTE_REMOVE, &[product_id]), "id", id),
                &name,
            )])
        })
        .collect();

    let mut table = TableConfig::embedded(ATTRIBUTES_TABLE, columns, rows, labels)
        .refresh_url(routes::url(routes::PRODUCT_ATTRIBUTE_TABLE, &[product_id]))
        .sorted_by("name", "asc")
        .empty(&l.attribute.empty, "No attributes have been assigned to this product yet.")
        .primary(PrimaryAction::new(
            &l.attribute.assign,
            &routes::url(routes::PRODUCT_ATTRIBUTE_ASSIGN, &[product_id]),
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
    let attributes = attributes_for(deps.db.as_ref(), product_id).await;
    let table = build_attribute_table(product_id, &attributes, &deps.labels.product, deps.table_labels());
    ViewResult::ok("table-card", &table)
}

/// Global attributes minus the ones already on the product.
pub async fn available_attributes(db: &dyn DataSource, product_id: &str) -> Vec<AvailableAttribute> {
    let all = match db.list_simple(collections::ATTRIBUTE).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list global attributes: {}", e);
            return Vec::new();
        }
    };
    let assigned = attributes_for(db, product_id).await;
    let assigned: HashSet<&str> = assigned
        .iter()
        .map(|pa| pa.str_field("attribute_id"))
        .filter(|id| !id.is_empty())
        .collect();

    all.iter()
        .filter(|a| !assigned.contains(a.id()))
        .map(|a| AvailableAttribute {
            id: a.text("id"),
            name: a.text("name"),
            code: a.text("code"),
        })
        .collect()
}

/// GET lists unassigned attributes; POST assigns one, copying its name and code.
pub async fn assign(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    let product_id = ctx.param("id");
    let l = &deps.labels.product.attribute;

    if ctx.is_get() {
        let form = AttributeForm {
            product_id: product_id.to_string(),
            available_attributes: available_attributes(deps.db.as_ref(), product_id).await,
            labels: l.clone(),
        };
        return ViewResult::ok(
            "attribute-drawer-form",
            &FormPage::add(routes::url(routes::PRODUCT_ATTRIBUTE_ASSIGN, &[product_id]), form),
        );
    }

    let attribute_id = ctx.form.get("attribute_id");
    if attribute_id.is_empty() {
        return htmx_error(&l.select);
    }

    let (name, code) = match deps.db.read(collections::ATTRIBUTE, attribute_id).await {
        Ok(attribute) => (attribute.text("name"), attribute.text("code")),
        Err(e) => {
            tracing::warn!(attribute_id, "attribute lookup failed: {}", e);
            (String::new(), String::new())
        }
    };

    let data = record! {
        "product_id" => product_id,
        "attribute_id" => attribute_id,
        "attribute_name" => name,
        "attribute_code" => code,
        "default_value" => ctx.form.get("default_value"),
        "active" => ctx.form.checkbox("active"),
    };
    if let Err(e) = deps.db.create(collections::PRODUCT_ATTRIBUTE, data).await {
        tracing::error!("Failed to create product attribute: {}", e);
        return htmx_error("Failed to assign attribute");
    }
    htmx_success(ATTRIBUTES_TABLE)
}

pub async fn remove(deps: &ViewDeps, ctx: &ViewContext) -> ViewResult {
    delete_one(
        deps.db.as_ref(),
        ctx,
        collections::PRODUCT_ATTRIBUTE,
        ATTRIBUTES_TABLE,
        "Product attribute",
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDataSource;
    use crate::view::labels::Labels;
    use crate::view::ViewSettings;
    use std::sync::Arc;

    async fn setup() -> (Arc<InMemoryDataSource>, ViewDeps) {
        let db = Arc::new(InMemoryDataSource::new());
        for (id, name, code) in [("a1", "Color", "color"), ("a2", "Size", "size")] {
            db.create(collections::ATTRIBUTE, record! { "id" => id, "name" => name, "code" => code })
                .await
                .unwrap();
        }
        let deps = ViewDeps::new(db.clone(), Arc::new(Labels::default()), ViewSettings::default());
        (db, deps)
    }

    #[tokio::test]
    async fn test_assign_denormalises_name_and_code() {
        let (db, deps) = setup().await;
        let ctx = ViewContext::post("/x")
            .with_param("id", "p1")
            .with_form("attribute_id", "a1")
            .with_form("default_value", "Red");
        let result = assign(&deps, &ctx).await;
        assert!(result.header("HX-Trigger").unwrap().contains(ATTRIBUTES_TABLE));

        let assigned = attributes_for(db.as_ref(), "p1").await;
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].str_field("attribute_name"), "Color");
        assert_eq!(assigned[0].str_field("attribute_code"), "color");
    }

    #[tokio::test]
    async fn test_only_unassigned_attributes_offered() {
        let (db, deps) = setup().await;
        db.create(
            collections::PRODUCT_ATTRIBUTE,
            record! { "product_id" => "p1", "attribute_id" => "a1" },
        )
        .await
        .unwrap();
        let result = assign(&deps, &ViewContext::get("/x").with_param("id", "p1")).await;
        let options = result.data().unwrap()["availableAttributes"].as_array().unwrap().clone();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["name"], "Size");
    }

    #[tokio::test]
    async fn test_assign_requires_selection() {
        let (_db, deps) = setup().await;
        let result = assign(&deps, &ViewContext::post("/x").with_param("id", "p1")).await;
        assert_eq!(result.header("HX-Error-Message"), Some("Please select an attribute"));
    }
}
